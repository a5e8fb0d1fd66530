/// Process execution for BROCCOLI tools.
///
/// [`Runner`] is the seam between the analysis pipeline and the OS: the real
/// implementation spawns a child process, tests substitute a recording mock.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::errors::ToolError;

/// How the child's stdout/stderr are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capture {
    /// Collect output for the result record.
    #[default]
    Piped,
    /// Let the tool write straight to the terminal (progress stays visible).
    Inherit,
}

/// A fully resolved tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Absolute path of the tool binary.
    pub program: PathBuf,
    /// Arguments in order, positional inputs first.
    pub args: Vec<OsString>,
    /// Exported to the child as `BROCCOLI_DIR`.
    pub broccoli_dir: PathBuf,
    pub capture: Capture,
}

impl Invocation {
    /// Shell-quoted command line, for display and logging only.
    #[must_use]
    pub fn command_line(&self) -> String {
        let parts: Vec<String> = std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
    }
}

/// Raw result of a finished tool process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl RawOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Executes an [`Invocation`] to completion.
pub trait Runner {
    /// Run the tool and block until it exits.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::Spawn` if the process could not be started.
    /// A non-zero exit is not an error at this layer.
    fn run(&self, invocation: &Invocation) -> Result<RawOutput, ToolError>;
}

/// [`Runner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<RawOutput, ToolError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .env("BROCCOLI_DIR", broccoli_dir_env(&invocation.broccoli_dir))
            .stdin(Stdio::null());

        if invocation.capture == Capture::Piped {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        tracing::debug!(command = %invocation.command_line(), "spawning tool");
        let start = Instant::now();
        let output = cmd.output().map_err(|source| ToolError::Spawn {
            program: invocation.program.display().to_string(),
            source,
        })?;
        let duration = start.elapsed();

        Ok(RawOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
        })
    }
}

/// Value exported as `BROCCOLI_DIR`.
///
/// The tools concatenate sub-paths such as `filters/...` directly onto the
/// variable, so it must end with a separator.
#[must_use]
pub fn broccoli_dir_env(dir: &Path) -> OsString {
    let mut value = dir.as_os_str().to_owned();
    if !value.to_string_lossy().ends_with('/') {
        value.push("/");
    }
    value
}
