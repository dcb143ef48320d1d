//! Content-equivalence engine for git references.
//!
//! Decides whether two references (commits, branches, tags, relative
//! expressions) materialize to the same file tree, independent of history.
//! References are resolved and peeled to their trees first; equal tree ids
//! settle the question immediately. Otherwise the configured
//! [`ComparisonMethod`] decides:
//!
//! - [`ComparisonMethod::Archive`] digests what `git archive` produces for
//!   each tree, so export attributes and content filters are honoured;
//! - [`ComparisonMethod::Tree`] treats distinct trees as different;
//! - [`ComparisonMethod::Listing`] digests the recursive `(mode, id, path)`
//!   listing of each reference;
//! - [`ComparisonMethod::Diff`] asks `git diff --quiet`.
//!
//! ```no_run
//! use git_compare::{Comparison, CompareConfig, Console, OutputConfig};
//! use git_repository::Repository;
//!
//! let repo = Repository::discover(".")?;
//! let config = CompareConfig::from_repository(&repo)?;
//! let mut console = Console::stdio(OutputConfig::default());
//! let outcome = Comparison::new(&repo, &config, &mut console).run("v1.0", "main");
//! std::process::exit(outcome.exit_code());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod archive;
pub mod config;
pub mod engine;
mod error;
mod listing;
pub mod log;
mod method;
mod outcome;
pub mod report;
pub mod resolve;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use config::CompareConfig;
pub use engine::{short_circuit, Comparison};
pub use error::CompareError;
pub use log::{Console, Level, Log, OutputConfig, Recorder};
pub use method::ComparisonMethod;
pub use outcome::{ComparisonOutcome, Evidence, TreeId, Verdict};
pub use report::{DifferencesReport, DIFF_EXCERPT_LINES};
pub use resolve::ResolvedObject;

pub use git_hash::{Digest, HashAlgorithm};
