use git_hash::{Digest, HashAlgorithm, Hasher};
use git_repository::{RepositoryAccess, TreeEntry};

use crate::method::ComparisonMethod;
use crate::CompareError;

/// Feed a canonical serialization of `entries` to `hasher`.
///
/// Entries are ordered by raw path bytes, each written as
/// `"{mode} {oid}\t{path}\0"`, so the digest does not depend on the order
/// git happened to print them in.
pub(crate) fn write_canonical(entries: &mut [TreeEntry], hasher: &mut Hasher) {
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    for entry in entries.iter() {
        hasher.update(entry.mode.as_bytes());
        hasher.update(b" ");
        hasher.update(entry.oid.to_hex().as_bytes());
        hasher.update(b"\t");
        hasher.update(&entry.path);
        hasher.update(b"\0");
    }
}

/// Digest the recursive tree listing of `reference`.
pub(crate) fn listing_digest(
    repo: &dyn RepositoryAccess,
    reference: &str,
    algorithm: HashAlgorithm,
) -> Result<Digest, CompareError> {
    let mut entries = repo.list_tree_recursive(reference).map_err(|e| {
        CompareError::access(ComparisonMethod::Listing, format!("list the tree of '{reference}'"), e)
    })?;
    tracing::debug!(reference, entries = entries.len(), "listed tree");

    let mut hasher = Hasher::new(algorithm);
    write_canonical(&mut entries, &mut hasher);
    let digest = hasher.finalize();
    tracing::trace!(reference, %digest, "listing digest");
    Ok(digest)
}
