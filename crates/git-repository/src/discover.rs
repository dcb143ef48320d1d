use std::path::{Path, PathBuf};

use git_utils::subprocess::GitCommand;

use crate::RepoError;

/// Result of repository discovery.
#[derive(Debug)]
pub struct DiscoveredRepo {
    pub git_dir: PathBuf,
    /// Top level of the working tree; `None` for bare repositories and when
    /// discovery started inside the git directory.
    pub work_tree: Option<PathBuf>,
}

impl DiscoveredRepo {
    /// Directory queries run from. Tree-relative commands such as
    /// `git archive` only see the whole tree from the top level.
    pub fn command_dir(&self) -> &Path {
        self.work_tree.as_deref().unwrap_or(&self.git_dir)
    }
}

/// Ask git where the repository containing `start` lives.
///
/// Delegates to `git rev-parse`, so `GIT_DIR`, `GIT_CEILING_DIRECTORIES`,
/// gitdir files and linked worktrees behave exactly as they do for git.
pub fn discover_git_dir(program: &str, start: &Path) -> Result<DiscoveredRepo, RepoError> {
    if !start.is_dir() {
        return Err(RepoError::NotFound(start.to_path_buf()));
    }

    let cmd = rev_parse(program, start).args(["--absolute-git-dir", "--is-bare-repository"]);
    let result = cmd.run()?;
    if !result.success() {
        tracing::debug!(stderr = %result.stderr_lossy(), "rev-parse found no repository");
        return Err(RepoError::NotFound(start.to_path_buf()));
    }

    let (git_dir, bare) = parse_discovery(&String::from_utf8_lossy(&result.stdout)).ok_or_else(|| RepoError::Parse {
        command: cmd.command_string(),
        reason: "expected a git directory and a bare flag".to_string(),
    })?;
    let work_tree = if bare { None } else { show_toplevel(program, start)? };
    Ok(DiscoveredRepo { git_dir, work_tree })
}

fn rev_parse(program: &str, start: &Path) -> GitCommand {
    GitCommand::new(program)
        .arg("rev-parse")
        .env("LC_ALL", "C")
        .working_dir(start)
}

/// `rev-parse --show-toplevel` fails inside the git directory itself.
fn show_toplevel(program: &str, start: &Path) -> Result<Option<PathBuf>, RepoError> {
    let result = rev_parse(program, start).arg("--show-toplevel").run()?;
    if !result.success() {
        tracing::debug!(stderr = %result.stderr_lossy(), "no working tree above start");
        return Ok(None);
    }
    let top = String::from_utf8_lossy(&result.stdout).trim_end_matches(['\n', '\r']).to_string();
    Ok((!top.is_empty()).then(|| PathBuf::from(top)))
}

fn parse_discovery(stdout: &str) -> Option<(PathBuf, bool)> {
    let mut lines = stdout.lines();
    let git_dir = PathBuf::from(lines.next()?.trim());
    let bare = match lines.next()?.trim() {
        "true" => true,
        "false" => false,
        _ => return None,
    };
    Some((git_dir, bare))
}
