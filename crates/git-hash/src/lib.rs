//! Object identity and content digests for git-compare.
//!
//! Two different notions of "hash" live here. [`ObjectId`] is git's own
//! content address (SHA-1 or SHA-256 depending on the repository's object
//! format) and is only ever parsed from git's output. [`HashAlgorithm`] and
//! [`Hasher`] compute digests over materialized content chosen by the user.

mod algorithm;
mod error;
pub mod hasher;
pub mod hex;
mod oid;

pub use algorithm::HashAlgorithm;
pub use error::HashError;
pub use hasher::{Digest, Hasher};
pub use oid::{ObjectFormat, ObjectId};
