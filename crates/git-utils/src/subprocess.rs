use std::ffi::{OsStr, OsString};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use crate::error::UtilError;
use crate::Result;

/// Result of running a subprocess to completion.
#[derive(Debug)]
pub struct GitCommandResult {
    /// The exit status.
    pub status: ExitStatus,
    /// Captured stdout (empty when stdout was streamed elsewhere).
    pub stdout: Vec<u8>,
    /// Captured stderr.
    pub stderr: Vec<u8>,
}

impl GitCommandResult {
    /// Returns true if the process exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// The exit code, or `None` if the process was killed by a signal.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Stderr decoded lossily and trimmed, for error messages.
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Builder for subprocess execution.
///
/// Wraps `std::process::Command` with a fluent API. Stdin is always closed;
/// stderr is always captured so failures can be reported with context.
pub struct GitCommand {
    program: OsString,
    args: Vec<OsString>,
    env_vars: Vec<(OsString, OsString)>,
    working_dir: Option<PathBuf>,
}

impl GitCommand {
    /// Create a new command builder for the given program.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            env_vars: Vec::new(),
            working_dir: None,
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> Self {
        for arg in args {
            self.args.push(arg.as_ref().to_os_string());
        }
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<OsStr>, val: impl AsRef<OsStr>) -> Self {
        self.env_vars
            .push((key.as_ref().to_os_string(), val.as_ref().to_os_string()));
        self
    }

    /// Set the working directory.
    pub fn working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, val) in &self.env_vars {
            cmd.env(key, val);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// The command line, for log and error messages.
    pub fn command_string(&self) -> String {
        let mut s = self.program.to_string_lossy().to_string();
        for arg in &self.args {
            s.push(' ');
            s.push_str(&arg.to_string_lossy());
        }
        s
    }

    fn subprocess_error(&self, source: io::Error) -> UtilError {
        UtilError::Subprocess {
            command: self.command_string(),
            source,
        }
    }

    /// Run the command and wait for it to complete, capturing stdout and stderr.
    ///
    /// A non-zero exit status is not an error here; callers decide what the
    /// status means.
    pub fn run(&self) -> Result<GitCommandResult> {
        tracing::debug!(command = %self.command_string(), "running");
        let output = self
            .build_command()
            .output()
            .map_err(|e| self.subprocess_error(e))?;
        tracing::trace!(
            status = ?output.status.code(),
            stdout_len = output.stdout.len(),
            "finished"
        );
        Ok(GitCommandResult {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Run the command, copying stdout into `sink` as it is produced.
    ///
    /// Stderr is drained on a helper thread so a chatty child cannot block
    /// on a full pipe while stdout is being consumed. The returned result has
    /// an empty `stdout`.
    pub fn run_streaming(&self, sink: &mut dyn Write) -> Result<GitCommandResult> {
        tracing::debug!(command = %self.command_string(), "running (streaming)");
        let mut child = self
            .build_command()
            .spawn()
            .map_err(|e| self.subprocess_error(e))?;

        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf);
                buf
            })
        });

        let copied = match child.stdout.take() {
            Some(mut stdout) => io::copy(&mut stdout, sink),
            None => Ok(0),
        };

        // Always reap the child, even when the copy failed.
        let status = child.wait().map_err(|e| self.subprocess_error(e))?;
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        let copied = copied.map_err(|e| self.subprocess_error(e))?;
        tracing::trace!(status = ?status.code(), bytes = copied, "finished (streaming)");

        Ok(GitCommandResult {
            status,
            stdout: Vec::new(),
            stderr,
        })
    }
}
