use std::fmt;
use std::str::FromStr;

use crate::CompareError;

/// Which strategy decides content equality once tree ids differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComparisonMethod {
    /// Digest the materialized archive of each tree. Most accurate: content
    /// filters and export attributes are applied exactly as on checkout.
    #[default]
    Archive,
    /// Tree id equality only. Fastest; blind to filter-equivalent content.
    Tree,
    /// Digest a canonical `(mode, object id, path)` listing of each tree.
    Listing,
    /// Ask git's own tree diff whether anything changed.
    Diff,
}

impl ComparisonMethod {
    pub const ALL: [ComparisonMethod; 4] = [Self::Archive, Self::Tree, Self::Listing, Self::Diff];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Tree => "tree",
            Self::Listing => "listing",
            Self::Diff => "diff",
        }
    }

    /// Whether the strategy computes digests with the chosen algorithm.
    pub const fn uses_digest(&self) -> bool {
        matches!(self, Self::Archive | Self::Listing)
    }

    fn expected_names() -> String {
        Self::ALL.iter().map(|m| m.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for ComparisonMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComparisonMethod {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == lowered)
            .ok_or_else(|| CompareError::InvalidMethod {
                name: s.to_string(),
                expected: Self::expected_names(),
            })
    }
}
