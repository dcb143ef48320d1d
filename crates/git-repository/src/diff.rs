use std::fmt;

use bstr::{BString, ByteSlice};

/// File-level change status, from the letters of `git diff --name-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Copied,
    Deleted,
    Modified,
    Renamed,
    TypeChanged,
    Unmerged,
    Unknown,
}

impl ChangeStatus {
    pub fn from_letter(letter: u8) -> Self {
        match letter {
            b'A' => Self::Added,
            b'C' => Self::Copied,
            b'D' => Self::Deleted,
            b'M' => Self::Modified,
            b'R' => Self::Renamed,
            b'T' => Self::TypeChanged,
            b'U' => Self::Unmerged,
            _ => Self::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Copied => "copied",
            Self::Deleted => "deleted",
            Self::Modified => "modified",
            Self::Renamed => "renamed",
            Self::TypeChanged => "type changed",
            Self::Unmerged => "unmerged",
            Self::Unknown => "unknown",
        }
    }

    /// Renames and copies carry a source path as well as a destination.
    fn has_source_path(self) -> bool {
        matches!(self, Self::Renamed | Self::Copied)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One line of a name/status listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameStatus {
    pub status: ChangeStatus,
    /// Similarity percentage for renames and copies.
    pub score: Option<u8>,
    /// The path on the right-hand side (the destination for renames).
    pub path: BString,
    /// The source path for renames and copies.
    pub old_path: Option<BString>,
}

/// Parse `git diff --name-status -z` output.
///
/// Each record is `<status>[score] NUL <path> NUL`, with a second path for
/// renames and copies.
pub fn parse_name_status(output: &[u8]) -> Result<Vec<NameStatus>, String> {
    let mut fields = output.split(|&b| b == 0).filter(|f| !f.is_empty());
    let mut entries = Vec::new();

    while let Some(code) = fields.next() {
        let status = ChangeStatus::from_letter(code[0]);
        let score = if code.len() > 1 {
            let digits = code[1..]
                .to_str()
                .map_err(|_| format!("bad status field {:?}", code.as_bstr()))?;
            Some(
                digits
                    .parse::<u8>()
                    .map_err(|_| format!("bad similarity score {:?}", code.as_bstr()))?,
            )
        } else {
            None
        };

        let first = fields
            .next()
            .ok_or_else(|| format!("status {:?} without a path", code.as_bstr()))?;
        let (path, old_path) = if status.has_source_path() {
            let second = fields
                .next()
                .ok_or_else(|| format!("{status} of {:?} without a destination", first.as_bstr()))?;
            (BString::from(second), Some(BString::from(first)))
        } else {
            (BString::from(first), None)
        };

        entries.push(NameStatus {
            status,
            score,
            path,
            old_path,
        });
    }
    Ok(entries)
}
