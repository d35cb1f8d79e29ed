//! Build command execution.
//!
//! Commands run through the platform shell (or a configured override) with
//! the step directory as working directory. The driver's own working
//! directory is never changed. Stderr is inherited so package manager output
//! streams straight to the terminal; stdout is inherited too unless the caller
//! reserves it for a machine-readable report.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::execute::types::ExecuteError;
use crate::platform::shell_for;

/// Where a child's standard output goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildStdout {
  /// Share the driver's stdout.
  #[default]
  Inherit,
  /// Send it to the driver's stderr, leaving stdout to the driver alone.
  Stderr,
}

impl ChildStdout {
  fn stdio(self) -> Stdio {
    match self {
      ChildStdout::Inherit => Stdio::inherit(),
      ChildStdout::Stderr => Stdio::from(std::io::stderr()),
    }
  }
}

/// Run `cmd` in `dir` and wait for it.
///
/// # Arguments
///
/// * `cmd` - The command string, passed to the shell as a single argument
/// * `dir` - Working directory for the child process
/// * `shell` - Optional shell override (defaults to /bin/sh on Unix, cmd.exe on Windows)
/// * `stdout` - Destination of the child's standard output
///
/// # Errors
///
/// `Spawn` when the shell cannot be started, `CmdFailed` when the command
/// exits unsuccessfully.
pub async fn execute_cmd(
  cmd: &str,
  dir: &Path,
  shell: Option<&str>,
  stdout: ChildStdout,
) -> Result<(), ExecuteError> {
  info!(cmd = %cmd, dir = %dir.display(), "executing command");

  let (shell_cmd, shell_args) = shell_for(shell);

  let mut command = Command::new(&shell_cmd);
  command
    .args(&shell_args)
    .arg(cmd)
    .current_dir(dir)
    .stdin(Stdio::null())
    .stdout(stdout.stdio())
    .stderr(Stdio::inherit());

  debug!(shell = %shell_cmd, args = ?shell_args, stdout = ?stdout, "spawning process");

  let status = command.status().await.map_err(|source| ExecuteError::Spawn {
    cmd: cmd.to_string(),
    dir: dir.to_path_buf(),
    source,
  })?;

  if !status.success() {
    debug!(status = %status, "command failed");
    return Err(ExecuteError::CmdFailed {
      cmd: cmd.to_string(),
      dir: dir.to_path_buf(),
      code: status.code(),
    });
  }

  debug!(status = %status, "command finished");
  Ok(())
}
