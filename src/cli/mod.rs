//! Command-line interface for meshcell.
//!
//! # Commands
//!
//! - `instantiate` - turn a template into a finalized instance plus its secrets
//! - `validate` - check a template and its run-time inputs without writing anything
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging
//! - `--quiet` / `-q` - errors only, no progress output
//! - `--config` / `-c` - engine config file (else `MESHCELL_CONFIG`, else `./meshcell.toml`)
//!
//! # Examples
//!
//! ```bash
//! meshcell instantiate -t hr.yaml -i hr-inst --bindings deps.yaml
//! meshcell instantiate -t pet-be.yaml -i pet-be --overrides overrides.yaml --dry-run
//! meshcell validate -t pet-be.yaml --overrides overrides.yaml --format json
//! ```

pub mod common;
mod instantiate;
mod validate;

use crate::config::EngineConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use instantiate::InstantiateCommand;
pub use validate::{OutputFormat, ValidateCommand, ValidationResults};

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: &'static str,
    /// Suppress everything but errors.
    pub quiet: bool,
    /// Explicit engine config file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global tracing subscriber. Repeated calls are no-ops.
    pub fn init_logging(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.log_level));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "meshcell",
    about = "Instantiate mesh cell and composite templates",
    version,
    long_about = "meshcell resolves a template's dependencies, applies per-component overrides and \
                  writes the finalized instance together with any TLS secrets it needs."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Engine config file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an instance from a template
    Instantiate(InstantiateCommand),

    /// Check a template, its bindings and its overrides
    Validate(ValidateCommand),
}

impl Cli {
    /// Run the selected command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; the binary turns it into a message and exit code 1.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "meshcell=debug"
        } else if self.quiet {
            "error"
        } else {
            "meshcell=info"
        };

        CliConfig {
            log_level,
            quiet: self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an already-built [`CliConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the engine config cannot be loaded or the command fails.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let working_dir = std::env::current_dir()?;
        let engine = EngineConfig::load_with_optional(config.config_path.clone(), &working_dir).await?;

        match self.command {
            Commands::Instantiate(cmd) => cmd.execute(engine, config.quiet).await,
            Commands::Validate(cmd) => cmd.execute(engine, config.quiet).await,
        }
    }
}
