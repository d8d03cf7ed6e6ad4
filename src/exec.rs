//! Process execution behind an injectable [`Executor`] seam.
use anyhow::{Context as _, Result, bail};
use std::process::{Command, ExitStatus, Stdio};

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Whether the process exited successfully.
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
}

impl From<ExitStatus> for ExecResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Abstraction over process execution.
///
/// Production code uses [`SystemExecutor`]; tests substitute a mock so that
/// no real command (least of all a reboot) is ever issued.
#[cfg_attr(test, mockall::automock)]
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run an opaque command line through the platform shell (`sh -c` on
    /// Unix, `cmd /C` on Windows), failing if it exits non-zero.
    ///
    /// Standard streams are detached and output is not captured, so a
    /// command that backgrounds a child (`shutdown -r +1 &`) returns as soon
    /// as the shell exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot be spawned or exits non-zero.
    fn run_shell(&self, command_line: &str) -> Result<ExecResult>;
}

/// Execute a command with detached stdio, bailing on non-zero exit.
fn execute_detached(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(status);
    if !result.success {
        bail!("{label} failed (exit {})", result.code.unwrap_or(-1));
    }
    Ok(result)
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_shell(&self, command_line: &str) -> Result<ExecResult> {
        #[cfg(windows)]
        let cmd = {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command_line]);
            cmd
        };
        #[cfg(not(windows))]
        let cmd = {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command_line]);
            cmd
        };
        execute_detached(cmd, command_line)
    }
}
