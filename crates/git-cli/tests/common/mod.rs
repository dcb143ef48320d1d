//! Shared test harness for git-compare integration tests.
//!
//! Provides process runners and repo setup utilities used by all test files.
//! Environment variables are fully pinned for deterministic output across
//! machines and CI runners.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

// ──────────────────────────── Types ────────────────────────────

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

// ──────────────────────────── Binary Discovery ────────────────────────────

/// Path to the compiled `git-compare` binary.
pub fn compare_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_git-compare"))
}

// ──────────────────────────── Process Runners ────────────────────────────

/// Apply the full set of pinned environment variables to a `Command`.
fn pin_env(cmd: &mut Command, dir: &Path) {
    cmd.env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_AUTHOR_DATE", "1234567890 +0000")
        .env("GIT_COMMITTER_NAME", "Test Committer")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_DATE", "1234567890 +0000")
        .env("TZ", "UTC")
        .env("LC_ALL", "C")
        .env("LANG", "C")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("HOME", dir.parent().unwrap_or(dir))
        .env_remove("RUST_LOG")
        .env_remove("GIT_COMPARE_TRACE");
}

fn capture(mut cmd: Command, what: &str) -> CommandResult {
    let output = cmd.output().unwrap_or_else(|e| panic!("failed to run {what}: {e}"));
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Run C git in `dir` with the given arguments.
pub fn git(dir: &Path, args: &[&str]) -> CommandResult {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(dir);
    pin_env(&mut cmd, dir);
    capture(cmd, "git")
}

/// Run C git and require success.
pub fn git_ok(dir: &Path, args: &[&str]) -> String {
    let result = git(dir, args);
    assert_eq!(result.exit_code, 0, "git {:?} failed: {}", args, result.stderr);
    result.stdout.trim().to_string()
}

/// Run git-compare in `dir` with the given arguments.
pub fn compare(dir: &Path, args: &[&str]) -> CommandResult {
    let mut cmd = Command::new(compare_bin());
    cmd.args(args).current_dir(dir);
    pin_env(&mut cmd, dir);
    capture(cmd, "git-compare")
}

// ──────────────────────────── Repo Setup ────────────────────────────

/// Create an empty repository in a fresh temp dir.
pub fn init_repo() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = std::fs::canonicalize(dir.path()).unwrap().join("repo");
    std::fs::create_dir(&root).unwrap();
    git_ok(&root, &["init", "-q", "-b", "main"]);
    (dir, root)
}

/// Stage everything, commit, and tag the commit.
pub fn commit_all(dir: &Path, message: &str, tag: &str) {
    git_ok(dir, &["add", "-A"]);
    git_ok(dir, &["commit", "-q", "--allow-empty", "-m", message]);
    git_ok(dir, &["tag", tag]);
}

/// `v1` has `a.txt`; `v2` modifies it and adds `newfile.txt`.
pub fn setup_added_file() -> (tempfile::TempDir, PathBuf) {
    let (dir, root) = init_repo();
    std::fs::write(root.join("a.txt"), "one\n").unwrap();
    std::fs::create_dir(root.join("sub")).unwrap();
    std::fs::write(root.join("sub/b.txt"), "bee\n").unwrap();
    commit_all(&root, "first commit", "v1");
    std::fs::write(root.join("newfile.txt"), "new\n").unwrap();
    commit_all(&root, "add newfile", "v2");
    (dir, root)
}

/// `v1` and `v2` have the same tree; `v2` is an empty commit on top.
pub fn setup_shared_tree() -> (tempfile::TempDir, PathBuf) {
    let (dir, root) = init_repo();
    std::fs::write(root.join("a.txt"), "one\n").unwrap();
    commit_all(&root, "first commit", "v1");
    commit_all(&root, "empty commit", "v2");
    (dir, root)
}

/// `v1` and `v2` differ only in `scratch.txt`, which is `export-ignore`d.
pub fn setup_export_ignored_change() -> (tempfile::TempDir, PathBuf) {
    let (dir, root) = init_repo();
    std::fs::write(root.join(".gitattributes"), "scratch.txt export-ignore\n").unwrap();
    std::fs::write(root.join("a.txt"), "kept\n").unwrap();
    std::fs::write(root.join("scratch.txt"), "build 1\n").unwrap();
    commit_all(&root, "first commit", "v1");
    std::fs::write(root.join("scratch.txt"), "build 2\n").unwrap();
    commit_all(&root, "rebuild scratch", "v2");
    (dir, root)
}

/// `v2` adds `big.txt`; the full diff is 6 header lines plus 114 additions.
pub fn setup_long_diff() -> (tempfile::TempDir, PathBuf) {
    let (dir, root) = init_repo();
    std::fs::write(root.join("a.txt"), "one\n").unwrap();
    commit_all(&root, "first commit", "v1");
    let big: String = (0..114).map(|i| format!("line {i}\n")).collect();
    std::fs::write(root.join("big.txt"), big).unwrap();
    commit_all(&root, "add big", "v2");
    (dir, root)
}

/// `v2` stores `a.txt` with CRLF endings; `eol=crlf` makes both check out
/// the same bytes.
pub fn setup_line_ending_change() -> (tempfile::TempDir, PathBuf) {
    let (dir, root) = init_repo();
    std::fs::write(root.join(".gitattributes"), "*.txt text eol=crlf\n").unwrap();
    std::fs::write(root.join("a.txt"), "x\n").unwrap();
    commit_all(&root, "first commit", "v1");

    let raw = root.join(".git").join("crlf-blob");
    std::fs::write(&raw, "x\r\n").unwrap();
    let blob = git_ok(&root, &["hash-object", "-w", "--no-filters", raw.to_str().unwrap()]);
    git_ok(&root, &["update-index", "--cacheinfo", &format!("100644,{blob},a.txt")]);
    git_ok(&root, &["commit", "-q", "-m", "store crlf"]);
    git_ok(&root, &["tag", "v2"]);
    (dir, root)
}
