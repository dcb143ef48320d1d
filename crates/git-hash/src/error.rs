/// Errors produced by hash and OID operations.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("invalid hex character at position {position}: '{character}'")]
    InvalidHex { position: usize, character: char },

    #[error("invalid object id length: expected 40 or 64 hex digits, got {actual}")]
    InvalidHexLength { actual: usize },

    #[error("unknown digest algorithm '{name}' (supported: {supported})")]
    UnknownAlgorithm { name: String, supported: String },
}
