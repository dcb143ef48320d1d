//! Repository access layer: read-only queries answered by the `git` executable.
//!
//! [`RepositoryAccess`] is the contract the comparison engine consumes;
//! [`Repository`] implements it by running git plumbing commands in the
//! discovered repository. Nothing here writes to the repository: commands run
//! with `GIT_OPTIONAL_LOCKS=0` so not even the index stat cache is refreshed.

mod access;
pub mod diff;
mod discover;
mod error;
pub mod object;

pub use access::RepositoryAccess;
pub use diff::{ChangeStatus, NameStatus};
pub use error::RepoError;
pub use object::{ObjectKind, TreeEntry};

use std::io::Write;
use std::path::{Path, PathBuf};

use bstr::BString;
use git_hash::ObjectId;
use git_utils::subprocess::{GitCommand, GitCommandResult};

/// A repository located by git, queried through git subprocesses.
#[derive(Debug, Clone)]
pub struct Repository {
    /// Program used for every query (normally `git`).
    program: String,
    /// Absolute path of the git directory, as reported by git.
    git_dir: PathBuf,
    /// Top level of the working tree, if there is one.
    work_tree: Option<PathBuf>,
    /// Directory commands are run from: the work tree, else the git directory.
    command_dir: PathBuf,
}

impl Repository {
    /// Discover the repository containing `start`, the way git does.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::discover_with_program("git", start)
    }

    /// Discover using a specific git executable.
    pub fn discover_with_program(program: &str, start: impl AsRef<Path>) -> Result<Self, RepoError> {
        let found = discover::discover_git_dir(program, start.as_ref())?;
        let command_dir = found.command_dir().to_path_buf();
        tracing::debug!(
            git_dir = %found.git_dir.display(),
            command_dir = %command_dir.display(),
            bare = found.work_tree.is_none(),
            "discovered repository"
        );
        Ok(Self {
            program: program.to_string(),
            git_dir: found.git_dir,
            work_tree: found.work_tree,
            command_dir,
        })
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// `None` for bare repositories.
    pub fn work_tree(&self) -> Option<&Path> {
        self.work_tree.as_deref()
    }

    /// Base command: no pager, no prompts, no optional locks, C locale.
    fn git(&self) -> GitCommand {
        GitCommand::new(&self.program)
            .arg("--no-pager")
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_OPTIONAL_LOCKS", "0")
            .working_dir(&self.command_dir)
    }

    /// Run and require a zero exit status.
    fn run_checked(&self, cmd: &GitCommand) -> Result<GitCommandResult, RepoError> {
        let result = cmd.run()?;
        if result.success() {
            Ok(result)
        } else {
            Err(RepoError::from_result(cmd.command_string(), &result))
        }
    }

    /// Run `rev-parse --verify --quiet` on `expr`. `None` when `expr` does not
    /// name an object of the requested type; any other failure is an error.
    fn verify(&self, expr: &str) -> Result<Option<ObjectId>, RepoError> {
        let cmd = self
            .git()
            .args(["rev-parse", "--verify", "--quiet"])
            .arg(expr);
        let result = cmd.run()?;
        match result.code() {
            Some(0) => {}
            Some(1) => {
                tracing::debug!(expr, "rev-parse could not verify");
                return Ok(None);
            }
            _ => return Err(RepoError::from_result(cmd.command_string(), &result)),
        }
        let stdout = String::from_utf8_lossy(&result.stdout);
        let oid = stdout.trim().parse::<ObjectId>().map_err(|e| RepoError::Parse {
            command: cmd.command_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(oid))
    }
}

/// Split on `\n` only, so carriage returns inside diff content survive.
fn split_lines(output: &[u8]) -> Vec<BString> {
    if output.is_empty() {
        return Vec::new();
    }
    let body = output.strip_suffix(b"\n").unwrap_or(output);
    body.split(|&b| b == b'\n').map(BString::from).collect()
}

fn parse_error(cmd: &GitCommand, reason: impl Into<String>) -> RepoError {
    RepoError::Parse {
        command: cmd.command_string(),
        reason: reason.into(),
    }
}

impl RepositoryAccess for Repository {
    fn resolve_reference(&self, spec: &str) -> Result<(ObjectId, ObjectKind), RepoError> {
        let oid = self
            .verify(&format!("{spec}^{{object}}"))?
            .ok_or_else(|| RepoError::UnknownRevision(spec.to_string()))?;

        let cmd = self.git().args(["cat-file", "-t"]).arg(oid.to_hex());
        let result = self.run_checked(&cmd)?;
        let kind = ObjectKind::from_type_name(&String::from_utf8_lossy(&result.stdout));
        Ok((oid, kind))
    }

    fn tree_id_of(&self, spec: &str) -> Result<ObjectId, RepoError> {
        self.verify(&format!("{spec}^{{tree}}"))?
            .ok_or_else(|| RepoError::NotATree(spec.to_string()))
    }

    fn materialize_archive(&self, tree: &ObjectId, sink: &mut dyn Write) -> Result<(), RepoError> {
        let cmd = self
            .git()
            .args(["archive", "--format=tar"])
            .arg(tree.to_hex());
        let result = cmd.run_streaming(sink)?;
        if !result.success() {
            return Err(RepoError::from_result(cmd.command_string(), &result));
        }
        Ok(())
    }

    fn list_tree_recursive(&self, spec: &str) -> Result<Vec<TreeEntry>, RepoError> {
        let cmd = self
            .git()
            .args(["ls-tree", "-r", "-z", "--full-tree"])
            .arg(spec);
        let result = self.run_checked(&cmd)?;
        object::parse_ls_tree(&result.stdout).map_err(|reason| parse_error(&cmd, reason))
    }

    fn diff_quiet(&self, left: &str, right: &str) -> Result<bool, RepoError> {
        let cmd = self
            .git()
            .args(["diff", "--quiet", "--no-ext-diff", "--no-textconv"])
            .args([left, right, "--"]);
        let result = cmd.run()?;
        match result.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(RepoError::from_result(cmd.command_string(), &result)),
        }
    }

    fn diff_name_status(&self, left: &str, right: &str) -> Result<Vec<NameStatus>, RepoError> {
        let cmd = self
            .git()
            .args(["diff", "--name-status", "-z", "--no-ext-diff"])
            .args([left, right, "--"]);
        let result = self.run_checked(&cmd)?;
        diff::parse_name_status(&result.stdout).map_err(|reason| parse_error(&cmd, reason))
    }

    fn diff_stat(&self, left: &str, right: &str) -> Result<String, RepoError> {
        let cmd = self
            .git()
            .args(["diff", "--stat", "--no-color", "--no-ext-diff"])
            .args([left, right, "--"]);
        let result = self.run_checked(&cmd)?;
        Ok(String::from_utf8_lossy(&result.stdout).trim_end().to_string())
    }

    fn diff_unified(&self, left: &str, right: &str) -> Result<Vec<BString>, RepoError> {
        let cmd = self
            .git()
            .args(["diff", "--no-color", "--no-ext-diff", "--no-textconv"])
            .args([left, right, "--"]);
        let result = self.run_checked(&cmd)?;
        Ok(split_lines(&result.stdout))
    }

    fn commit_subject(&self, spec: &str) -> Result<Option<String>, RepoError> {
        let cmd = self
            .git()
            .args(["log", "-1", "--no-color", "--format=%s"])
            .args([spec, "--"]);
        let result = self.run_checked(&cmd)?;
        let subject = String::from_utf8_lossy(&result.stdout).trim().to_string();
        Ok((!subject.is_empty()).then_some(subject))
    }

    fn config_get(&self, key: &str) -> Result<Option<String>, RepoError> {
        let cmd = self.git().args(["config", "--get", key]);
        let result = cmd.run()?;
        match result.code() {
            Some(0) => Ok(Some(String::from_utf8_lossy(&result.stdout).trim().to_string())),
            Some(1) => Ok(None),
            _ => Err(RepoError::from_result(cmd.command_string(), &result)),
        }
    }
}
