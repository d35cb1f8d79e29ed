//! Opening the generated documentation with the host's default viewer.
//!
//! Each platform has an ordered list of launchers. They are tried one after
//! another until one exits successfully. A configured viewer replaces the
//! list entirely.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::platform::os::Os;

/// A program (plus leading arguments) that opens a file given as last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
  pub program: String,
  pub args: Vec<String>,
}

impl Launcher {
  pub fn new(program: &str, args: &[&str]) -> Self {
    Self {
      program: program.to_string(),
      args: args.iter().map(|a| a.to_string()).collect(),
    }
  }

  /// Build a launcher from a user-supplied command line such as `firefox --new-tab`.
  pub fn parse(command: &str) -> Option<Self> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some(Self {
      program: program.to_string(),
      args: parts.map(str::to_string).collect(),
    })
  }

  fn launch(&self, path: &Path) -> Result<(), String> {
    let status = Command::new(&self.program)
      .args(&self.args)
      .arg(path)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .map_err(|e| e.to_string())?;

    if status.success() {
      Ok(())
    } else {
      Err(format!("exited with {}", status))
    }
  }
}

impl fmt::Display for Launcher {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Errors from opening the output. Never fatal to a run.
#[derive(Debug, Error)]
pub enum OpenError {
  /// The documentation build did not produce the entry file.
  #[error("output file not found: {0}")]
  Missing(PathBuf),

  /// The platform has no known launcher and none is configured.
  #[error("no viewer known for this platform")]
  NoLauncher,

  /// Every launcher was tried and none succeeded.
  #[error("could not open {}: {}", .path.display(), format_attempts(.attempts))]
  AllFailed { path: PathBuf, attempts: Vec<(Launcher, String)> },
}

fn format_attempts(attempts: &[(Launcher, String)]) -> String {
  attempts
    .iter()
    .map(|(launcher, reason)| format!("{} ({})", launcher, reason))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Opens a file with some external viewer.
pub trait Opener {
  /// Open `path`, returning the launcher that succeeded.
  fn open(&self, path: &Path) -> Result<Launcher, OpenError>;
}

/// Opener backed by the platform's default-handler programs.
#[derive(Debug, Clone)]
pub struct SystemOpener {
  launchers: Vec<Launcher>,
}

impl SystemOpener {
  /// Launchers for `os`, or only `viewer` when one is configured.
  pub fn for_os(os: Option<Os>, viewer: Option<&str>) -> Self {
    let launchers = match viewer.and_then(Launcher::parse) {
      Some(launcher) => vec![launcher],
      None => os.map(default_launchers).unwrap_or_default(),
    };
    Self { launchers }
  }

  /// Opener for the current host honoring the config's `viewer`.
  pub fn from_config(config: &BuildConfig) -> Self {
    Self::for_os(Os::current(), config.viewer.as_deref())
  }

  pub fn launchers(&self) -> &[Launcher] {
    &self.launchers
  }
}

impl Opener for SystemOpener {
  fn open(&self, path: &Path) -> Result<Launcher, OpenError> {
    if !path.is_file() {
      return Err(OpenError::Missing(path.to_path_buf()));
    }
    if self.launchers.is_empty() {
      return Err(OpenError::NoLauncher);
    }

    let mut attempts = Vec::new();
    for launcher in &self.launchers {
      debug!(launcher = %launcher, path = %path.display(), "trying viewer");
      match launcher.launch(path) {
        Ok(()) => {
          info!(launcher = %launcher, path = %path.display(), "opened output");
          return Ok(launcher.clone());
        }
        Err(reason) => {
          debug!(launcher = %launcher, reason = %reason, "viewer failed");
          attempts.push((launcher.clone(), reason));
        }
      }
    }

    Err(OpenError::AllFailed {
      path: path.to_path_buf(),
      attempts,
    })
  }
}

/// Default-handler programs for each platform, in the order they are tried.
pub fn default_launchers(os: Os) -> Vec<Launcher> {
  match os {
    Os::Linux => vec![
      Launcher::new("xdg-open", &[]),
      Launcher::new("gio", &["open"]),
      Launcher::new("sensible-browser", &[]),
    ],
    Os::MacOs => vec![Launcher::new("open", &[])],
    // `start` treats its first quoted argument as a window title.
    Os::Windows => vec![
      Launcher::new("cmd", &["/C", "start", ""]),
      Launcher::new("explorer", &[]),
    ],
  }
}

/// Open the configured output file under `root`.
///
/// Makes exactly one call to `opener`; returns the opened path.
pub fn open_output<O: Opener + ?Sized>(root: &Path, config: &BuildConfig, opener: &O) -> Result<PathBuf, OpenError> {
  let path = root.join(&config.output);
  opener.open(&path)?;
  Ok(path)
}
