mod cmd;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cmd::{BuildArgs, cmd_build};
use crate::output::print_error;

/// docbuild - build the repository's libraries and documentation site
#[derive(Parser)]
#[command(name = "docbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,

  #[command(flatten)]
  build: BuildArgs,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  // RUST_LOG wins; --verbose only changes the default
  let filter = if cli.verbose {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
  } else {
    EnvFilter::from_default_env()
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cmd_build(cli.build) {
    Ok(code) => code,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
