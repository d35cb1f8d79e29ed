//! docbuild-lib: build orchestration for a multi-library documentation site
//!
//! This crate provides the pieces the `docbuild` binary strings together:
//! - `config`: repository root resolution and the `docbuild.toml` layout
//! - `execute`: build steps, the command runner, and the fail-fast pipeline
//! - `open`: launching the generated docs with the host's default viewer
//! - `platform`: OS detection and the default shell

pub mod config;
pub mod consts;
pub mod execute;
pub mod open;
pub mod platform;
