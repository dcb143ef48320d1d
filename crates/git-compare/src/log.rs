//! User-facing output, injected into the engine.
//!
//! The engine never prints directly. It reports through a [`Log`], which the
//! CLI backs with a [`Console`] and tests back with a [`Recorder`]. This is
//! separate from `tracing` diagnostics, which go to stderr and are meant for
//! debugging the tool itself.

use std::io::Write;

use git_utils::cli::Verbosity;

/// Output settings, passed explicitly rather than held in globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputConfig {
    pub verbose: bool,
    pub quiet: bool,
}

impl From<Verbosity> for OutputConfig {
    fn from(v: Verbosity) -> Self {
        OutputConfig {
            verbose: v == Verbosity::Verbose,
            quiet: v == Verbosity::Quiet,
        }
    }
}

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Intermediate evidence, shown only with `--verbose`.
    Detail,
    /// Normal output such as the verdict, hidden by `--quiet`.
    Info,
    /// Problems that do not change the outcome; never hidden.
    Warn,
    /// The reason a comparison failed; never hidden.
    Error,
}

/// Sink for user-facing messages.
pub trait Log {
    fn log(&mut self, level: Level, message: &str);

    fn detail(&mut self, message: &str) {
        self.log(Level::Detail, message);
    }

    fn info(&mut self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&mut self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&mut self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Writes messages to an output and an error stream, filtered by
/// [`OutputConfig`].
pub struct Console<O: Write, E: Write> {
    config: OutputConfig,
    out: O,
    err: E,
}

impl Console<std::io::Stdout, std::io::Stderr> {
    /// Console over the process's stdout and stderr.
    pub fn stdio(config: OutputConfig) -> Self {
        Console::new(config, std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(config: OutputConfig, out: O, err: E) -> Self {
        Console { config, out, err }
    }

    pub fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Detail => self.config.verbose && !self.config.quiet,
            Level::Info => !self.config.quiet,
            Level::Warn | Level::Error => true,
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Log for Console<O, E> {
    fn log(&mut self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        // A closed pipe must not turn a verdict into a panic.
        let _ = match level {
            Level::Detail | Level::Info => writeln!(self.out, "{message}"),
            Level::Warn => writeln!(self.err, "warning: {message}"),
            Level::Error => writeln!(self.err, "error: {message}"),
        };
    }
}

/// Collects every message regardless of verbosity.
#[derive(Debug, Default)]
pub struct Recorder {
    pub messages: Vec<(Level, String)>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages at exactly `level`.
    pub fn at(&self, level: Level) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|(_, m)| m.contains(needle))
    }
}

impl Log for Recorder {
    fn log(&mut self, level: Level, message: &str) {
        self.messages.push((level, message.to_string()));
    }
}
