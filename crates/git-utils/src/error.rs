/// Base error type for git-utils operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("subprocess failed: {command}: {source}")]
    Subprocess {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to create scratch file: {0}")]
    Scratch(#[source] std::io::Error),

    #[error("invalid log filter '{filter}': {reason}")]
    LogFilter { filter: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
