//! Command line interface for the bundler pipeline.
//!
//! Argument parsing, configuration resolution and command dispatch. Each
//! subcommand maps to one handler in [`commands`].

mod args;
pub mod commands;
mod output;

pub use args::{Cli, Command, GlobalArgs};
pub use output::OutputManager;

use crate::bundler::runner::SystemRunner;
use crate::config::{BundleConfig, CliOverrides, ConfigFile, DEFAULT_CONFIG_FILE};
use crate::error::{CliError, Result};
use std::path::Path;

/// Main CLI entry point. Returns the process exit code.
pub async fn run() -> Result<i32> {
    let cli = Cli::parse_args();
    if let Err(reason) = cli.validate() {
        return Err(CliError::InvalidArguments { reason }.into());
    }

    let config = load_config(&cli.global)?;
    let runner = SystemRunner;
    let output = OutputManager::new();

    match &cli.command {
        Command::Fetch => commands::fetch(&config, &runner, &output).await,
        Command::Build { platform } => {
            commands::build(&config, &runner, &output, *platform).await
        }
        Command::BuildAll { fail_fast } => {
            commands::build_all(&config, &runner, &output, *fail_fast).await
        }
        Command::Merge => commands::merge(&config, &runner, &output).await,
        Command::Package { version } => commands::package(&config, &output, version).await,
        Command::Release { version, fail_fast } => {
            commands::release(&config, &runner, &output, version, *fail_fast).await
        }
        Command::Clean => commands::clean(&config, &output).await,
    }
}

/// Loads the optional configuration file and folds in CLI overrides.
///
/// An explicitly passed `--config` must exist; the default file is used
/// only when present in the working directory.
fn load_config(global: &GlobalArgs) -> Result<BundleConfig> {
    let file = match &global.config {
        Some(path) => Some(ConfigFile::load(path)?),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                Some(ConfigFile::load(default)?)
            } else {
                None
            }
        }
    };
    Ok(BundleConfig::resolve(&CliOverrides::from(global), file))
}
