//! Types for build step execution.
//!
//! This module defines the steps a run is made of, the result recorded for
//! each completed step, and the errors that abort a run.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// What a build step builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
  /// One of the configured libraries.
  Library,
  /// The documentation generator.
  Docs,
}

/// A single build command invocation in a fixed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
  pub kind: StepKind,
  /// Directory relative to the repository root, as configured.
  pub path: PathBuf,
  /// Absolute working directory for the command.
  pub dir: PathBuf,
}

impl BuildStep {
  /// Banner label: the configured path for libraries, `DOCS` for the docs step.
  pub fn label(&self) -> String {
    match self.kind {
      StepKind::Library => self.path.display().to_string(),
      StepKind::Docs => "DOCS".to_string(),
    }
  }
}

impl fmt::Display for BuildStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.label())
  }
}

/// Errors from running a single build step.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The step directory does not exist.
  #[error("directory not found: {0}")]
  MissingDirectory(PathBuf),

  /// The shell could not be started.
  #[error("failed to spawn `{cmd}` in {dir}: {source}")]
  Spawn {
    cmd: String,
    dir: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The command ran and reported failure.
  #[error("command failed with exit code {code:?}: {cmd} (in {dir})")]
  CmdFailed {
    cmd: String,
    dir: PathBuf,
    code: Option<i32>,
  },
}

impl ExecuteError {
  /// Exit code reported by the failed command, if it exited normally.
  pub fn exit_code(&self) -> Option<i32> {
    match self {
      ExecuteError::CmdFailed { code, .. } => *code,
      _ => None,
    }
  }
}

/// Result of a completed build step.
#[derive(Debug, Clone)]
pub struct StepResult {
  pub step: BuildStep,
  pub duration: Duration,
}

/// Summary of a successful run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
  /// Completed steps in execution order.
  pub steps: Vec<StepResult>,
}

impl RunReport {
  /// Total time spent in build commands.
  pub fn total_duration(&self) -> Duration {
    self.steps.iter().map(|s| s.duration).sum()
  }
}

/// A run aborted at `step`.
#[derive(Debug, Error)]
#[error("build step {step} failed: {source}")]
pub struct PipelineError {
  /// The step that failed.
  pub step: BuildStep,
  /// Steps that completed before the failure.
  pub completed: Vec<StepResult>,
  #[source]
  pub source: ExecuteError,
}

impl PipelineError {
  /// Process exit code for this failure.
  ///
  /// The failed command's own code when it is a usable non-zero value,
  /// otherwise 1.
  pub fn exit_code(&self) -> i32 {
    match self.source.exit_code() {
      Some(code) if code != 0 => code,
      _ => 1,
    }
  }
}
