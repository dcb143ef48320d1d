//! Shared CLI option types, built on clap.
//!
//! The verbosity flags follow the usual git conventions: `-q/--quiet`
//! silences everything but errors, `-v/--verbose` adds intermediate detail,
//! and the two are mutually exclusive. `-C <path>` runs as if started in
//! `<path>`.

use std::path::PathBuf;

/// Global options shared by git-compare commands.
#[derive(Debug, Clone, clap::Args)]
pub struct GlobalOptions {
    /// Run as if started in <path>.
    #[arg(short = 'C', value_name = "path")]
    pub directory: Option<PathBuf>,

    /// Suppress all non-error output.
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print resolved objects and intermediate evidence.
    #[arg(long, short)]
    pub verbose: bool,
}

/// How much output a command should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl GlobalOptions {
    /// Collapse the flags into a single verbosity level.
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}
