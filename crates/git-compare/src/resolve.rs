use git_hash::ObjectId;
use git_repository::{ObjectKind, RepoError, RepositoryAccess};

use crate::outcome::TreeId;
use crate::CompareError;

/// Shown when a commit has no subject line or it cannot be read.
pub const NO_SUBJECT: &str = "(no commit message)";

/// A reference after verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedObject {
    pub object_id: ObjectId,
    pub kind: ObjectKind,
    /// Commit subject for commits, otherwise the kind name.
    pub description: String,
}

/// Reject what git would parse as an option, or nothing at all.
fn check_syntax(reference: &str) -> Result<(), CompareError> {
    if reference.trim().is_empty() || reference.starts_with('-') {
        return Err(CompareError::InvalidReference {
            reference: reference.to_string(),
        });
    }
    Ok(())
}

/// Verify that `reference` names an existing object and describe it.
pub fn resolve(repo: &dyn RepositoryAccess, reference: &str) -> Result<ResolvedObject, CompareError> {
    check_syntax(reference)?;

    let (object_id, kind) = repo.resolve_reference(reference).map_err(|err| match err {
        RepoError::UnknownRevision(_) => CompareError::InvalidReference {
            reference: reference.to_string(),
        },
        other => CompareError::query(format!("resolve '{reference}'"), other),
    })?;

    let description = match kind {
        ObjectKind::Commit => match repo.commit_subject(reference) {
            Ok(Some(subject)) => subject,
            Ok(None) => NO_SUBJECT.to_string(),
            Err(err) => {
                tracing::debug!(reference, error = %err, "commit subject unavailable");
                NO_SUBJECT.to_string()
            }
        },
        ref other => other.name().to_string(),
    };

    tracing::debug!(reference, oid = %object_id, %kind, "resolved reference");
    Ok(ResolvedObject {
        object_id,
        kind,
        description,
    })
}

/// Peel `reference` to the tree it denotes.
///
/// `kind` is what the reference resolved to and only feeds the error message.
pub fn tree_of(repo: &dyn RepositoryAccess, reference: &str, kind: &ObjectKind) -> Result<TreeId, CompareError> {
    match repo.tree_id_of(reference) {
        Ok(oid) => Ok(TreeId(oid)),
        Err(RepoError::NotATree(_)) => Err(CompareError::NotATree {
            reference: reference.to_string(),
            kind: kind.to_string(),
        }),
        Err(other) => Err(CompareError::query(format!("read the tree of '{reference}'"), other)),
    }
}
