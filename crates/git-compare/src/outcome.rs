use std::fmt;

use git_hash::{Digest, ObjectId};

use crate::CompareError;

/// Identifier of a tree snapshot. Two references with equal `TreeId`s have
/// identical content: paths, modes, blob contents and symlink targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(pub ObjectId);

impl TreeId {
    pub fn object_id(&self) -> &ObjectId {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Method-specific data justifying a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    /// Both references share this tree; no strategy ran.
    SharedTree(TreeId),
    /// The two distinct trees (tree method).
    Trees { left: TreeId, right: TreeId },
    /// Digests of each side (archive and listing methods).
    Digests { left: Digest, right: Digest },
    /// Whether git's tree diff found changes (diff method).
    DiffQuiet { changes: bool },
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::SharedTree(tree) => write!(f, "shared tree {tree}"),
            Evidence::Trees { left, right } => write!(f, "trees {left} vs {right}"),
            Evidence::Digests { left, right } if left == right => {
                write!(f, "{} {}", left.algorithm(), left)
            }
            Evidence::Digests { left, right } => {
                write!(f, "{} {} vs {}", left.algorithm(), left, right)
            }
            Evidence::DiffQuiet { changes: true } => f.write_str("diff found changes"),
            Evidence::DiffQuiet { changes: false } => f.write_str("diff found no changes"),
        }
    }
}

/// A successfully reached answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Identical(Evidence),
    Different(Evidence),
}

impl Verdict {
    pub fn evidence(&self) -> &Evidence {
        match self {
            Verdict::Identical(e) | Verdict::Different(e) => e,
        }
    }

    pub fn is_identical(&self) -> bool {
        matches!(self, Verdict::Identical(_))
    }
}

/// The engine's externally observable result: identical, different, or an
/// error that prevented a verdict.
#[derive(Debug)]
pub enum ComparisonOutcome {
    Identical(Evidence),
    Different(Evidence),
    Error(CompareError),
}

impl ComparisonOutcome {
    pub const EXIT_IDENTICAL: i32 = 0;
    pub const EXIT_DIFFERENT: i32 = 1;

    /// Process exit status: 0 identical, 1 different, 2 error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ComparisonOutcome::Identical(_) => Self::EXIT_IDENTICAL,
            ComparisonOutcome::Different(_) => Self::EXIT_DIFFERENT,
            ComparisonOutcome::Error(e) => e.exit_code(),
        }
    }

    pub fn evidence(&self) -> Option<&Evidence> {
        match self {
            ComparisonOutcome::Identical(e) | ComparisonOutcome::Different(e) => Some(e),
            ComparisonOutcome::Error(_) => None,
        }
    }

    pub fn is_different(&self) -> bool {
        matches!(self, ComparisonOutcome::Different(_))
    }
}

impl From<Result<Verdict, CompareError>> for ComparisonOutcome {
    fn from(result: Result<Verdict, CompareError>) -> Self {
        match result {
            Ok(Verdict::Identical(e)) => ComparisonOutcome::Identical(e),
            Ok(Verdict::Different(e)) => ComparisonOutcome::Different(e),
            Err(e) => ComparisonOutcome::Error(e),
        }
    }
}
