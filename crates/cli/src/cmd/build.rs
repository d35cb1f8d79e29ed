//! Implementation of the `docbuild` run.
//!
//! Builds every configured library in order, then the documentation site, and
//! optionally opens the generated entry file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{debug, warn};

use docbuild_lib::config::{BuildConfig, resolve_root};
use docbuild_lib::execute::{
  BuildStep, ChildStdout, PipelineError, PipelineObserver, RunReport, ShellRunner, StepKind, StepResult, plan_steps,
  run_pipeline,
};
use docbuild_lib::open::{SystemOpener, open_output};

use crate::output::{
  OutputFormat, format_duration, print_banner, print_error, print_info, print_json, print_stat, print_success,
  print_warning, symbols,
};

/// Positional argument that requests opening the generated docs.
const OPEN_ARG: &str = "o";

#[derive(Args, Debug)]
pub struct BuildArgs {
  /// Repository root (default: $DOCBUILD_ROOT, then this tool's own workspace)
  #[arg(short, long)]
  pub root: Option<PathBuf>,

  /// Path to the configuration file (default: <root>/docbuild.toml if present)
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  /// Open the generated docs after a successful build
  #[arg(long)]
  pub open: bool,

  /// Print the planned steps without running them
  #[arg(long)]
  pub dry_run: bool,

  /// Output format
  #[arg(long, value_enum, default_value = "text")]
  pub output: OutputFormat,

  /// Extra arguments; `o` opens the generated docs, anything else is ignored.
  /// Options may appear before, between, or after them.
  #[arg(value_name = "ARGS")]
  pub args: Vec<String>,
}

impl BuildArgs {
  pub fn wants_open(&self) -> bool {
    self.open || self.args.iter().any(|a| a == OPEN_ARG)
  }
}

#[derive(Debug, Serialize)]
struct StepOutput {
  kind: StepKind,
  path: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  duration_ms: Option<u64>,
}

impl StepOutput {
  fn planned(step: &BuildStep) -> Self {
    Self {
      kind: step.kind,
      path: step.path.display().to_string(),
      duration_ms: None,
    }
  }

  fn completed(result: &StepResult) -> Self {
    Self {
      duration_ms: Some(result.duration.as_millis() as u64),
      ..Self::planned(&result.step)
    }
  }
}

#[derive(Debug, Serialize)]
struct BuildOutput {
  root: String,
  success: bool,
  dry_run: bool,
  steps: Vec<StepOutput>,
  #[serde(skip_serializing_if = "Option::is_none")]
  failed: Option<FailureOutput>,
  #[serde(skip_serializing_if = "Option::is_none")]
  opened: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  open_error: Option<String>,
}

#[derive(Debug, Serialize)]
struct FailureOutput {
  step: StepOutput,
  error: String,
  exit_code: i32,
}

/// Prints a banner before each step and a timing line after it.
struct Banners;

impl PipelineObserver for Banners {
  fn step_started(&mut self, _index: usize, _total: usize, step: &BuildStep) {
    print_banner(&step.label());
  }

  fn step_finished(&mut self, result: &StepResult) {
    print_success(&format!(
      "Built {} in {}",
      result.step.label(),
      format_duration(result.duration)
    ));
  }
}

/// Execute a build run.
///
/// Resolves the repository root and layout, runs every build step in order
/// and stops at the first failure. Opening the docs is attempted only after
/// every step succeeded, and a failure to open never changes the exit code.
///
/// # Errors
///
/// Returns an error if the root or configuration cannot be resolved, or the
/// async runtime cannot start. Build failures are reported and mapped to the
/// returned exit code instead.
pub fn cmd_build(args: BuildArgs) -> Result<ExitCode> {
  let root = resolve_root(args.root.as_deref()).context("Failed to resolve repository root")?;
  let config = BuildConfig::discover(&root, args.config.as_deref()).context("Failed to load configuration")?;
  let steps = plan_steps(&root, &config);
  let json = args.output.is_json();

  debug!(root = %root.display(), steps = steps.len(), "planned build");

  if args.dry_run {
    print_plan(&root, &steps, args.wants_open(), &config, args.output)?;
    return Ok(ExitCode::SUCCESS);
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let mut runner = ShellRunner::from_config(&config);
  if json {
    // stdout is reserved for the report.
    runner = runner.with_stdout(ChildStdout::Stderr);
  }

  let result = if json {
    rt.block_on(run_pipeline(&steps, &runner, &mut ()))
  } else {
    rt.block_on(run_pipeline(&steps, &runner, &mut Banners))
  };

  let report = match result {
    Ok(report) => report,
    Err(err) => return report_failure(&root, &err, args.output),
  };

  let mut opened = None;
  let mut open_error = None;
  if args.wants_open() {
    match open_output(&root, &config, &SystemOpener::from_config(&config)) {
      Ok(path) => opened = Some(path),
      Err(err) => {
        warn!(error = %err, "failed to open docs");
        open_error = Some(err.to_string());
      }
    }
  }

  if json {
    print_json(&BuildOutput {
      root: root.display().to_string(),
      success: true,
      dry_run: false,
      steps: report.steps.iter().map(StepOutput::completed).collect(),
      failed: None,
      opened: opened.map(|p| p.display().to_string()),
      open_error,
    })?;
  } else {
    print_summary(&report);
    if let Some(path) = opened {
      print_info(&format!("Opened {}", path.display()));
    }
    if let Some(err) = open_error {
      print_warning(&format!("Could not open docs: {}", err));
    }
  }

  Ok(ExitCode::SUCCESS)
}

fn print_summary(report: &RunReport) {
  println!();
  print_success(&format!(
    "Build complete: {} step(s) in {}",
    report.steps.len(),
    format_duration(report.total_duration())
  ));
}

fn report_failure(root: &Path, err: &PipelineError, output: OutputFormat) -> Result<ExitCode> {
  let code = err.exit_code();

  if output.is_json() {
    print_json(&BuildOutput {
      root: root.display().to_string(),
      success: false,
      dry_run: false,
      steps: err.completed.iter().map(StepOutput::completed).collect(),
      failed: Some(FailureOutput {
        step: StepOutput::planned(&err.step),
        error: err.source.to_string(),
        exit_code: code,
      }),
      opened: None,
      open_error: None,
    })?;
  } else {
    print_error(&err.to_string());
  }

  Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}

fn print_plan(
  root: &Path,
  steps: &[BuildStep],
  open: bool,
  config: &BuildConfig,
  output: OutputFormat,
) -> Result<()> {
  if output.is_json() {
    return print_json(&BuildOutput {
      root: root.display().to_string(),
      success: true,
      dry_run: true,
      steps: steps.iter().map(StepOutput::planned).collect(),
      failed: None,
      opened: None,
      open_error: None,
    });
  }

  print_info("Dry run - no commands will be executed");
  print_stat("Root", &root.display().to_string());
  print_stat("Command", &config.command);
  println!();
  for (index, step) in steps.iter().enumerate() {
    println!("  {}. {} {}", index + 1, symbols::ARROW, step.label());
  }
  if open {
    println!();
    print_stat("Open", &root.join(&config.output).display().to_string());
  }

  Ok(())
}
