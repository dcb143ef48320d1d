use std::path::PathBuf;

/// Errors from repository queries.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a git repository (or any of the parent directories): {0}")]
    NotFound(PathBuf),

    #[error("unknown revision or object: '{0}'")]
    UnknownRevision(String),

    #[error("'{0}' does not point to a tree")]
    NotATree(String),

    #[error("'{command}' failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("unexpected output from '{command}': {reason}")]
    Parse { command: String, reason: String },

    #[error(transparent)]
    Util(#[from] git_utils::UtilError),
}

impl RepoError {
    /// Build a `Command` error from a finished subprocess.
    pub(crate) fn from_result(command: String, result: &git_utils::subprocess::GitCommandResult) -> Self {
        let status = match result.code() {
            Some(code) => format!("exit code {code}"),
            None => "killed by signal".to_string(),
        };
        let stderr = result.stderr_lossy();
        RepoError::Command {
            command,
            status,
            stderr: if stderr.is_empty() {
                "no error output".to_string()
            } else {
                stderr
            },
        }
    }
}
