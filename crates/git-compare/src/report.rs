//! Human-oriented summary of how two references differ.
//!
//! Only produced after a `Different` verdict. Failures here are reported as
//! warnings by the caller and never change the verdict.

use bstr::BString;
use git_repository::{NameStatus, RepositoryAccess};

use crate::CompareError;

/// Number of unified diff lines kept in a verbose report.
pub const DIFF_EXCERPT_LINES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferencesReport {
    pub name_status: Vec<NameStatus>,
    pub stat_summary: String,
    /// First [`DIFF_EXCERPT_LINES`] lines of the unified diff; empty unless
    /// the report was built verbosely.
    pub diff_excerpt: Vec<BString>,
    /// Set iff the full diff is longer than the excerpt.
    pub truncated: bool,
    /// Length of the full unified diff, or 0 when it was not requested.
    pub total_diff_lines: usize,
}

impl DifferencesReport {
    /// `"{N} total lines of diff, showing first 50"` when truncated.
    pub fn truncation_note(&self) -> Option<String> {
        self.truncated.then(|| {
            format!(
                "{} total lines of diff, showing first {}",
                self.total_diff_lines, DIFF_EXCERPT_LINES
            )
        })
    }

    /// Render the report as printed by the command line tool.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Changed files:\n");
        for entry in &self.name_status {
            match &entry.old_path {
                Some(old) => out.push_str(&format!("  {:<9} {} -> {}\n", entry.status.name(), old, entry.path)),
                None => out.push_str(&format!("  {:<9} {}\n", entry.status.name(), entry.path)),
            }
        }
        if !self.stat_summary.is_empty() {
            out.push('\n');
            out.push_str(&self.stat_summary);
            out.push('\n');
        }
        if !self.diff_excerpt.is_empty() {
            out.push('\n');
            for line in &self.diff_excerpt {
                out.push_str(&line.to_string());
                out.push('\n');
            }
        }
        if let Some(note) = self.truncation_note() {
            out.push_str(&format!("... ({note})\n"));
        }
        out
    }
}

/// Split a full diff into the excerpt, truncation flag and total length.
fn excerpt(mut lines: Vec<BString>) -> (Vec<BString>, bool, usize) {
    let total = lines.len();
    let truncated = total > DIFF_EXCERPT_LINES;
    lines.truncate(DIFF_EXCERPT_LINES);
    (lines, truncated, total)
}

/// Describe the differences between `left` and `right`.
pub fn report(
    repo: &dyn RepositoryAccess,
    left: &str,
    right: &str,
    verbose: bool,
) -> Result<DifferencesReport, CompareError> {
    let name_status = repo
        .diff_name_status(left, right)
        .map_err(|e| CompareError::query("list changed files", e))?;
    let stat_summary = repo
        .diff_stat(left, right)
        .map_err(|e| CompareError::query("summarize the diff", e))?;

    let (diff_excerpt, truncated, total_diff_lines) = if verbose {
        let lines = repo
            .diff_unified(left, right)
            .map_err(|e| CompareError::query("produce the unified diff", e))?;
        excerpt(lines)
    } else {
        (Vec::new(), false, 0)
    };

    tracing::debug!(
        files = name_status.len(),
        total_diff_lines,
        truncated,
        "built differences report"
    );
    Ok(DifferencesReport {
        name_status,
        stat_summary,
        diff_excerpt,
        truncated,
        total_diff_lines,
    })
}

#[cfg(test)]
mod tests {
    use git_repository::ChangeStatus;
    use proptest::prelude::*;

    use super::*;
    use crate::testing::{Call, FakeRepo};

    fn lines(n: usize) -> Vec<BString> {
        (0..n).map(|i| BString::from(format!("+line {i}"))).collect()
    }

    fn added(path: &str) -> NameStatus {
        NameStatus {
            status: ChangeStatus::Added,
            score: None,
            path: BString::from(path),
            old_path: None,
        }
    }

    #[test]
    fn verbose_report_of_long_diff_is_truncated() {
        let repo = FakeRepo::new()
            .name_status("v1", "v2", vec![added("newfile.txt")])
            .unified("v1", "v2", lines(120));
        let report = report(&repo, "v1", "v2", true).unwrap();

        assert_eq!(report.diff_excerpt.len(), 50);
        assert_eq!(report.diff_excerpt[49], BString::from("+line 49"));
        assert!(report.truncated);
        assert_eq!(report.total_diff_lines, 120);
        assert_eq!(
            report.truncation_note().as_deref(),
            Some("120 total lines of diff, showing first 50")
        );
        assert!(report.render().contains("120 total lines of diff, showing first 50"));
    }

    #[test]
    fn exactly_fifty_lines_is_not_truncated() {
        let repo = FakeRepo::new().unified("a", "b", lines(50));
        let report = report(&repo, "a", "b", true).unwrap();
        assert!(!report.truncated);
        assert_eq!(report.diff_excerpt.len(), 50);
        assert_eq!(report.truncation_note(), None);
    }

    #[test]
    fn quiet_report_skips_unified_diff() {
        let repo = FakeRepo::new()
            .name_status("v1", "v2", vec![added("newfile.txt")])
            .unified("v1", "v2", lines(120));
        let report = report(&repo, "v1", "v2", false).unwrap();

        assert!(report.diff_excerpt.is_empty());
        assert!(!report.truncated);
        assert_eq!(report.total_diff_lines, 0);
        assert!(!repo.calls().iter().any(|c| matches!(c, Call::DiffUnified(..))));
    }

    #[test]
    fn render_lists_status_names() {
        let report = DifferencesReport {
            name_status: vec![
                added("newfile.txt"),
                NameStatus {
                    status: ChangeStatus::Renamed,
                    score: Some(100),
                    path: BString::from("new.rs"),
                    old_path: Some(BString::from("old.rs")),
                },
            ],
            stat_summary: " 1 file changed, 1 insertion(+)".to_string(),
            diff_excerpt: Vec::new(),
            truncated: false,
            total_diff_lines: 0,
        };
        let text = report.render();
        assert!(text.contains("  added     newfile.txt\n"));
        assert!(text.contains("  renamed   old.rs -> new.rs\n"));
        assert!(text.contains("1 file changed"));
    }

    #[test]
    fn failures_name_the_step() {
        let repo = FakeRepo::new().fail_diffs();
        let err = report(&repo, "v1", "v2", false).unwrap_err();
        assert!(err.to_string().starts_with("unable to list changed files"));
    }

    proptest! {
        #[test]
        fn truncated_iff_longer_than_excerpt(n in 0usize..200) {
            let (excerpt, truncated, total) = excerpt(lines(n));
            prop_assert_eq!(total, n);
            prop_assert_eq!(truncated, n > DIFF_EXCERPT_LINES);
            if !truncated {
                prop_assert_eq!(excerpt.len(), total);
            } else {
                prop_assert_eq!(excerpt.len(), DIFF_EXCERPT_LINES);
            }
        }
    }
}
