use std::io::Write;

use bstr::BString;
use git_hash::ObjectId;

use crate::diff::NameStatus;
use crate::object::{ObjectKind, TreeEntry};
use crate::RepoError;

/// Read-only queries the comparison engine needs from a repository.
///
/// Every method is a blocking call. Implementations must not retry and must
/// not modify the repository. [`crate::Repository`] answers these by running
/// the `git` executable; tests substitute scripted implementations.
pub trait RepositoryAccess {
    /// Verify that `spec` names an existing object and report its kind.
    ///
    /// Fails with [`RepoError::UnknownRevision`] if it does not.
    fn resolve_reference(&self, spec: &str) -> Result<(ObjectId, ObjectKind), RepoError>;

    /// Peel `spec` to its tree.
    ///
    /// Fails with [`RepoError::NotATree`] if it has no associated tree.
    fn tree_id_of(&self, spec: &str) -> Result<ObjectId, RepoError>;

    /// Stream a tar archive of `tree` into `sink`, with the repository's
    /// export attributes and content filters applied as a checkout would.
    fn materialize_archive(&self, tree: &ObjectId, sink: &mut dyn Write) -> Result<(), RepoError>;

    /// Every blob and gitlink reachable from `spec`, recursively.
    fn list_tree_recursive(&self, spec: &str) -> Result<Vec<TreeEntry>, RepoError>;

    /// `true` when the two tree-ish have no differences.
    fn diff_quiet(&self, left: &str, right: &str) -> Result<bool, RepoError>;

    fn diff_name_status(&self, left: &str, right: &str) -> Result<Vec<NameStatus>, RepoError>;

    /// Human-readable per-file stat and summary line.
    fn diff_stat(&self, left: &str, right: &str) -> Result<String, RepoError>;

    /// Full unified diff, one entry per line, without trailing newlines.
    fn diff_unified(&self, left: &str, right: &str) -> Result<Vec<BString>, RepoError>;

    /// First line of the commit message, if there is one.
    fn commit_subject(&self, spec: &str) -> Result<Option<String>, RepoError>;

    /// A single configuration value, or `None` if unset.
    fn config_get(&self, key: &str) -> Result<Option<String>, RepoError>;
}
