//! Build step execution module.
//!
//! This module provides the main entry points for running a build:
//! - Step planning from the repository layout
//! - The `BuildRunner` seam between the driver and subprocesses
//! - Strictly sequential, fail-fast pipeline execution

pub mod cmd;
pub mod types;

use std::future::Future;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::BuildConfig;

pub use cmd::{ChildStdout, execute_cmd};
pub use types::{BuildStep, ExecuteError, PipelineError, RunReport, StepKind, StepResult};

/// Runs the build command for one step.
pub trait BuildRunner {
  fn run(&self, step: &BuildStep) -> impl Future<Output = Result<(), ExecuteError>> + Send;
}

/// Runs the configured command through a shell.
#[derive(Debug, Clone)]
pub struct ShellRunner {
  command: String,
  shell: Option<String>,
  stdout: ChildStdout,
}

impl ShellRunner {
  pub fn new(command: impl Into<String>, shell: Option<String>) -> Self {
    Self {
      command: command.into(),
      shell,
      stdout: ChildStdout::Inherit,
    }
  }

  /// Redirect the children's stdout, e.g. when stdout carries a JSON report.
  pub fn with_stdout(mut self, stdout: ChildStdout) -> Self {
    self.stdout = stdout;
    self
  }

  pub fn from_config(config: &BuildConfig) -> Self {
    Self::new(config.command.clone(), config.shell.clone())
  }
}

impl BuildRunner for ShellRunner {
  async fn run(&self, step: &BuildStep) -> Result<(), ExecuteError> {
    execute_cmd(&self.command, &step.dir, self.shell.as_deref(), self.stdout).await
  }
}

/// Progress hooks called around each step.
///
/// Both methods default to no-ops.
pub trait PipelineObserver {
  fn step_started(&mut self, _index: usize, _total: usize, _step: &BuildStep) {}
  fn step_finished(&mut self, _result: &StepResult) {}
}

impl PipelineObserver for () {}

/// Build steps for a repository: every library in listed order, then the docs.
pub fn plan_steps(root: &Path, config: &BuildConfig) -> Vec<BuildStep> {
  let libs = config.libs.iter().map(|lib| BuildStep {
    kind: StepKind::Library,
    path: lib.clone(),
    dir: root.join(lib),
  });

  let docs = BuildStep {
    kind: StepKind::Docs,
    path: config.docs.clone(),
    dir: root.join(&config.docs),
  };

  libs.chain(std::iter::once(docs)).collect()
}

/// Run steps one at a time, stopping at the first failure.
///
/// A step whose directory is missing fails without invoking the runner.
///
/// # Errors
///
/// Returns a `PipelineError` naming the failed step. No later step is started.
pub async fn run_pipeline<R, O>(steps: &[BuildStep], runner: &R, observer: &mut O) -> Result<RunReport, PipelineError>
where
  R: BuildRunner,
  O: PipelineObserver + ?Sized,
{
  info!(step_count = steps.len(), "starting build");

  let mut report = RunReport::default();
  let total = steps.len();

  for (index, step) in steps.iter().enumerate() {
    observer.step_started(index, total, step);

    let start = Instant::now();
    let outcome = if step.dir.is_dir() {
      runner.run(step).await
    } else {
      Err(ExecuteError::MissingDirectory(step.dir.clone()))
    };

    if let Err(source) = outcome {
      // Callers report the failure themselves.
      debug!(step = %step, error = %source, "build step failed");
      return Err(PipelineError {
        step: step.clone(),
        completed: report.steps,
        source,
      });
    }

    let result = StepResult {
      step: step.clone(),
      duration: start.elapsed(),
    };
    debug!(step = %step, duration_ms = result.duration.as_millis() as u64, "build step finished");

    observer.step_finished(&result);
    report.steps.push(result);
  }

  info!(step_count = report.steps.len(), "build complete");
  Ok(report)
}
