//! Repository layout configuration.
//!
//! The driver works against a fixed repository layout: an ordered list of
//! library directories, a documentation generator directory, and the entry
//! file the generator writes. The defaults describe the upstream layout; a
//! `docbuild.toml` at the repository root can override any of them.
//!
//! # Config File Format
//!
//! ```toml
//! libs = ["libs/OPD-metadata-lib", "libs/OPD-settings-lib"]
//! docs = "docs-generator/typedoc"
//! output = "docs/index.html"
//! command = "npm run build"
//! # shell = "/bin/bash"
//! # viewer = "firefox"
//! ```

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_FILE_NAME, DEFAULT_COMMAND, DEFAULT_DOCS, DEFAULT_LIBS, DEFAULT_OUTPUT, ROOT_ENV};

/// Errors that can occur while resolving the root or loading the config.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The repository root does not exist or cannot be canonicalized.
  #[error("repository root {path} is not accessible: {source}")]
  Root {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The repository root exists but is not a directory.
  #[error("repository root {0} is not a directory")]
  RootNotDirectory(PathBuf),

  /// Failed to read the config file.
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to parse the config file TOML.
  #[error("failed to parse config file {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  /// The config parsed but describes an unusable layout.
  #[error("invalid config: {0}")]
  Invalid(String),
}

/// Repository layout and commands for a build run.
///
/// All paths are relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
  /// Library directories, built in listed order.
  pub libs: Vec<PathBuf>,
  /// Documentation generator directory, built after every library.
  pub docs: PathBuf,
  /// Entry file written by the documentation build.
  pub output: PathBuf,
  /// Build entry point run in every directory.
  pub command: String,
  /// Shell used to run `command`. Platform default when unset.
  pub shell: Option<String>,
  /// Program used to open `output`. Replaces the platform launchers when set.
  pub viewer: Option<String>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      libs: DEFAULT_LIBS.iter().map(PathBuf::from).collect(),
      docs: PathBuf::from(DEFAULT_DOCS),
      output: PathBuf::from(DEFAULT_OUTPUT),
      command: DEFAULT_COMMAND.to_string(),
      shell: None,
      viewer: None,
    }
  }
}

impl BuildConfig {
  /// Load and validate a config file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let config: BuildConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    config.validate()?;
    Ok(config)
  }

  /// Find the config for a repository.
  ///
  /// An explicit path must exist. Otherwise `<root>/docbuild.toml` is used when
  /// present, falling back to the built-in layout.
  pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
    if let Some(path) = explicit {
      debug!(path = %path.display(), "loading explicit config");
      return Self::load(path);
    }

    let candidate = root.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
      debug!(path = %candidate.display(), "loading config");
      return Self::load(&candidate);
    }

    debug!(root = %root.display(), "no config file, using built-in layout");
    Ok(Self::default())
  }

  /// Check that every path stays inside the repository, a command is set, and
  /// optional programs are not blank.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.command.trim().is_empty() {
      return Err(ConfigError::Invalid("`command` must not be empty".to_string()));
    }

    for lib in &self.libs {
      check_relative("libs", lib)?;
    }
    check_relative("docs", &self.docs)?;
    check_relative("output", &self.output)?;

    if self.shell.as_deref().is_some_and(|s| s.trim().is_empty()) {
      return Err(ConfigError::Invalid("`shell` must not be empty when set".to_string()));
    }

    if self.viewer.as_deref().is_some_and(|v| v.trim().is_empty()) {
      return Err(ConfigError::Invalid("`viewer` must not be empty when set".to_string()));
    }

    Ok(())
  }
}

fn check_relative(key: &str, path: &Path) -> Result<(), ConfigError> {
  if path.as_os_str().is_empty() {
    return Err(ConfigError::Invalid(format!("`{}` contains an empty path", key)));
  }

  let escapes = path
    .components()
    .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

  if escapes || path.is_absolute() {
    return Err(ConfigError::Invalid(format!(
      "`{}` path {} must be relative to the repository root",
      key,
      path.display()
    )));
  }

  Ok(())
}

/// Workspace root of this tool's own sources.
///
/// The driver lives inside the repository it builds, so its sources sit two
/// directories below the root.
pub fn source_root() -> PathBuf {
  let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
  manifest_dir
    .ancestors()
    .nth(2)
    .map(Path::to_path_buf)
    .unwrap_or_else(|| manifest_dir.to_path_buf())
}

/// Resolve the repository root.
///
/// Precedence: `explicit`, then `DOCBUILD_ROOT`, then [`source_root`].
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
  let candidate = match explicit {
    Some(path) => path.to_path_buf(),
    None => match std::env::var_os(ROOT_ENV) {
      Some(value) if !value.is_empty() => PathBuf::from(value),
      _ => source_root(),
    },
  };

  let root = dunce::canonicalize(&candidate).map_err(|source| ConfigError::Root {
    path: candidate.clone(),
    source,
  })?;

  if !root.is_dir() {
    return Err(ConfigError::RootNotDirectory(root));
  }

  debug!(root = %root.display(), "resolved repository root");
  Ok(root)
}
