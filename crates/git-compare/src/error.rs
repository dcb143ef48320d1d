use std::path::PathBuf;

use git_repository::RepoError;

use crate::method::ComparisonMethod;

/// Everything that can stop a comparison from reaching a verdict.
///
/// All variants are fatal to the invocation and map to exit status 2. A
/// content difference is never an error; see [`crate::Verdict`].
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("invalid reference '{reference}': no such commit, branch, tag or object")]
    InvalidReference { reference: String },

    #[error("reference '{reference}' resolves to a {kind}, which has no tree")]
    NotATree { reference: String, kind: String },

    #[error("hash algorithm '{name}' is not available (supported: {supported})")]
    AlgorithmUnavailable { name: String, supported: String },

    #[error("invalid comparison method '{name}' (expected one of: {expected})")]
    InvalidMethod { name: String, expected: String },

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{method} comparison failed to {operation}: {source}")]
    RepositoryAccess {
        method: ComparisonMethod,
        operation: String,
        #[source]
        source: RepoError,
    },

    #[error("unable to {operation}: {source}")]
    Query {
        operation: String,
        #[source]
        source: RepoError,
    },

    #[error("not a git repository (or any of the parent directories): {}", path.display())]
    NotARepository { path: PathBuf },
}

impl CompareError {
    /// Process exit status for any error.
    pub const EXIT_CODE: i32 = 2;

    pub fn exit_code(&self) -> i32 {
        Self::EXIT_CODE
    }

    /// Wrap an access-layer failure that happened outside a strategy
    /// (resolution, reporting, configuration).
    pub(crate) fn query(operation: impl Into<String>, source: RepoError) -> Self {
        CompareError::Query {
            operation: operation.into(),
            source,
        }
    }

    /// Wrap an access-layer failure inside a strategy.
    pub(crate) fn access(method: ComparisonMethod, operation: impl Into<String>, source: RepoError) -> Self {
        CompareError::RepositoryAccess {
            method,
            operation: operation.into(),
            source,
        }
    }
}

impl From<RepoError> for CompareError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(path) => CompareError::NotARepository { path },
            RepoError::UnknownRevision(reference) => CompareError::InvalidReference { reference },
            other => CompareError::query("query the repository", other),
        }
    }
}
