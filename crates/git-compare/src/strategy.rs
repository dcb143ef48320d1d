use git_hash::HashAlgorithm;
use git_repository::RepositoryAccess;

use crate::archive::archive_digest;
use crate::listing::listing_digest;
use crate::log::Log;
use crate::method::ComparisonMethod;
use crate::outcome::{Evidence, TreeId, Verdict};
use crate::CompareError;

/// One side of a comparison: the reference as given and its tree.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub reference: &'a str,
    pub tree: TreeId,
}

/// Decide equality of two sides whose tree ids already differ.
///
/// Archive works on the tree ids; listing and diff work on the references as
/// given.
pub fn dispatch(
    repo: &dyn RepositoryAccess,
    method: ComparisonMethod,
    algorithm: HashAlgorithm,
    left: Target<'_>,
    right: Target<'_>,
    log: &mut dyn Log,
) -> Result<Verdict, CompareError> {
    tracing::debug!(%method, left = left.reference, right = right.reference, "dispatching");
    match method {
        ComparisonMethod::Archive => {
            let a = archive_digest(repo, &left.tree, algorithm)?;
            log.detail(&format!("archive {} {}: {a}", algorithm, left.tree));
            let b = archive_digest(repo, &right.tree, algorithm)?;
            log.detail(&format!("archive {} {}: {b}", algorithm, right.tree));
            Ok(by_digest(a, b))
        }
        ComparisonMethod::Tree => Ok(Verdict::Different(Evidence::Trees {
            left: left.tree,
            right: right.tree,
        })),
        ComparisonMethod::Listing => {
            let a = listing_digest(repo, left.reference, algorithm)?;
            log.detail(&format!("listing {} {}: {a}", algorithm, left.reference));
            let b = listing_digest(repo, right.reference, algorithm)?;
            log.detail(&format!("listing {} {}: {b}", algorithm, right.reference));
            Ok(by_digest(a, b))
        }
        ComparisonMethod::Diff => {
            let quiet = repo
                .diff_quiet(left.reference, right.reference)
                .map_err(|e| {
                    CompareError::access(
                        ComparisonMethod::Diff,
                        format!("diff '{}' against '{}'", left.reference, right.reference),
                        e,
                    )
                })?;
            let evidence = Evidence::DiffQuiet { changes: !quiet };
            Ok(if quiet {
                Verdict::Identical(evidence)
            } else {
                Verdict::Different(evidence)
            })
        }
    }
}

fn by_digest(left: git_hash::Digest, right: git_hash::Digest) -> Verdict {
    if left == right {
        Verdict::Identical(Evidence::Digests { left, right })
    } else {
        Verdict::Different(Evidence::Digests { left, right })
    }
}
