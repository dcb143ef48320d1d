use git_repository::RepositoryAccess;

use crate::config::CompareConfig;
use crate::log::Log;
use crate::outcome::{ComparisonOutcome, Evidence, TreeId, Verdict};
use crate::report::report;
use crate::resolve::{resolve, tree_of};
use crate::strategy::{dispatch, Target};
use crate::CompareError;

/// Equal tree ids prove equal content; nothing else needs to run.
pub fn short_circuit(left: &TreeId, right: &TreeId) -> Option<Verdict> {
    (left == right).then(|| Verdict::Identical(Evidence::SharedTree(*left)))
}

/// One invocation of the comparison engine.
pub struct Comparison<'a> {
    repo: &'a dyn RepositoryAccess,
    config: &'a CompareConfig,
    log: &'a mut dyn Log,
}

impl<'a> Comparison<'a> {
    pub fn new(repo: &'a dyn RepositoryAccess, config: &'a CompareConfig, log: &'a mut dyn Log) -> Self {
        Self { repo, config, log }
    }

    /// Compare `left` with `right`, reporting progress and the verdict to the
    /// log. With `show_diff` set, a `Different` outcome is followed by a
    /// differences report unless output is quiet.
    pub fn run(&mut self, left: &str, right: &str) -> ComparisonOutcome {
        let outcome = ComparisonOutcome::from(self.compare(left, right));
        match &outcome {
            ComparisonOutcome::Identical(evidence) => {
                self.log.detail(&format!("evidence: {evidence}"));
                self.log.info(&format!("identical: '{left}' and '{right}' have the same content"));
            }
            ComparisonOutcome::Different(evidence) => {
                self.log.detail(&format!("evidence: {evidence}"));
                self.log.info(&format!(
                    "different: '{left}' and '{right}' differ ({} method)",
                    self.config.method
                ));
                if self.config.show_diff && !self.config.output.quiet {
                    self.show_diff(left, right);
                }
            }
            ComparisonOutcome::Error(err) => self.log.error(&err.to_string()),
        }
        outcome
    }

    fn compare(&mut self, left: &str, right: &str) -> Result<Verdict, CompareError> {
        let method = self.config.method;
        let algorithm = self.config.algorithm()?;
        tracing::debug!(left, right, %method, %algorithm, "starting comparison");

        let a = resolve(self.repo, left)?;
        self.log.detail(&format!("{left}: {} {} ({})", a.kind, a.object_id, a.description));
        let b = resolve(self.repo, right)?;
        self.log.detail(&format!("{right}: {} {} ({})", b.kind, b.object_id, b.description));

        let tree_a = tree_of(self.repo, left, &a.kind)?;
        self.log.detail(&format!("{left}: tree {tree_a}"));
        let tree_b = tree_of(self.repo, right, &b.kind)?;
        self.log.detail(&format!("{right}: tree {tree_b}"));

        if let Some(verdict) = short_circuit(&tree_a, &tree_b) {
            tracing::debug!(tree = %tree_a, "trees are equal; skipping {method}");
            return Ok(verdict);
        }

        dispatch(
            self.repo,
            method,
            algorithm,
            Target {
                reference: left,
                tree: tree_a,
            },
            Target {
                reference: right,
                tree: tree_b,
            },
            self.log,
        )
    }

    fn show_diff(&mut self, left: &str, right: &str) {
        match report(self.repo, left, right, self.config.output.verbose) {
            Ok(report) => self.log.info(report.render().trim_end()),
            Err(err) => self.log.warn(&format!("differences report unavailable: {err}")),
        }
    }
}
