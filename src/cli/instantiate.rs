//! `meshcell instantiate`

use super::common::{load_bindings, load_overrides, load_template};
use crate::config::{EngineConfig, UnmatchedPolicy};
use crate::instantiate::{InstantiationRequest, Instantiator};
use crate::persist::{self, ArtifactLayout};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Create an instance from a template.
///
/// Writes `<output-dir>/<instance>.yaml` and one `<output-dir>/<secret>.yaml` per TLS
/// secret. Either every file is written or none is.
#[derive(Args, Debug)]
pub struct InstantiateCommand {
    /// Template to instantiate
    #[arg(short, long, value_name = "FILE")]
    pub template: PathBuf,

    /// Name of the new instance (lowercase RFC 1123 label)
    #[arg(short, long, value_name = "NAME")]
    pub instance: String,

    /// Dependency bindings (alias -> org/name/version/instance)
    #[arg(short, long, value_name = "FILE")]
    pub bindings: Option<PathBuf>,

    /// Per-component overrides
    #[arg(short, long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Destination directory (default from config, `target/meshcell`)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// What to do with overrides for components the template lacks
    #[arg(long, value_enum)]
    pub unmatched: Option<UnmatchedPolicy>,

    /// Print the documents instead of writing them
    #[arg(long)]
    pub dry_run: bool,
}

impl InstantiateCommand {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be loaded, instantiation fails, or the
    /// artifacts cannot be written.
    pub async fn execute(self, mut config: EngineConfig, quiet: bool) -> Result<()> {
        if let Some(policy) = self.unmatched {
            config.overrides.unmatched = policy;
        }
        if let Some(dir) = self.output_dir {
            config.output.dir = dir;
        }

        let template = load_template(&self.template).await?;
        let request = InstantiationRequest::new(self.instance)
            .with_bindings(load_bindings(self.bindings.as_deref()).await?)
            .with_overrides(load_overrides(self.overrides.as_deref()).await?);

        let layout = ArtifactLayout::new(config.output.dir.clone());
        let result = Instantiator::new(config).instantiate(&template, &request)?;
        let artifacts = persist::render(&result, &layout)?;

        if self.dry_run {
            for artifact in &artifacts {
                println!("# {}", artifact.path.display());
                println!("---");
                print!("{}", artifact.contents);
            }
            return Ok(());
        }

        let written = persist::write_artifacts(artifacts).await?;
        if !quiet {
            println!(
                "{} Instantiated {} '{}' as '{}'",
                "✓".green(),
                template.kind,
                template.name(),
                request.instance_name.bold()
            );
            for path in &written {
                println!("  {}", path.display());
            }
        }
        Ok(())
    }
}
