use std::fmt;
use std::str::FromStr;

use crate::HashError;

/// Digest algorithms available for comparing materialized content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// MD5 (16 bytes / 128 bits).
    Md5,
    /// SHA-1 (20 bytes / 160 bits).
    Sha1,
    /// SHA-224 (28 bytes / 224 bits).
    Sha224,
    /// SHA-256 (default, 32 bytes / 256 bits).
    #[default]
    Sha256,
    /// SHA-384 (48 bytes / 384 bits).
    Sha384,
    /// SHA-512 (64 bytes / 512 bits).
    Sha512,
}

impl HashAlgorithm {
    /// Every supported algorithm, weakest first.
    pub const ALL: [HashAlgorithm; 6] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    /// Length of the digest in bytes.
    pub const fn digest_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Length of the hex representation.
    pub const fn hex_len(&self) -> usize {
        self.digest_len() * 2
    }

    /// Digest width in bits.
    pub const fn bits(&self) -> usize {
        self.digest_len() * 8
    }

    /// Canonical lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Look up an algorithm by name.
    ///
    /// Accepts the canonical name (`sha256`), the dashed spelling
    /// (`sha-256`) and the coreutils tool name (`sha256sum`), ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let base = lowered.strip_suffix("sum").unwrap_or(&lowered);
        let base = base.replace('-', "");
        Self::ALL.into_iter().find(|algo| algo.name() == base)
    }

    /// Comma-separated canonical names, for help and error text.
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| HashError::UnknownAlgorithm {
            name: s.to_string(),
            supported: Self::supported_names(),
        })
    }
}
