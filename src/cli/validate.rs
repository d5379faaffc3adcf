//! `meshcell validate`
//!
//! Loads a template with its bindings and overrides and runs every check the engine
//! runs before instantiating, without producing output files.
//!
//! # Examples
//!
//! ```bash
//! meshcell validate -t hr.yaml
//! meshcell validate -t hr.yaml --bindings deps.yaml --overrides overrides.yaml
//! meshcell validate -t hr.yaml --bindings deps.yaml --format json
//! ```

use super::common::{load_bindings, load_overrides, load_template};
use crate::config::{EngineConfig, UnmatchedPolicy};
use crate::instantiate::Instantiator;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Template to check
    #[arg(short, long, value_name = "FILE")]
    pub template: PathBuf,

    /// Dependency bindings to check against the template
    #[arg(short, long, value_name = "FILE")]
    pub bindings: Option<PathBuf>,

    /// Overrides to check against the template
    #[arg(short, long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// One JSON object
    Json,
}

/// What `validate` found, as printed with `--format json`.
#[derive(Debug, Default, Serialize)]
pub struct ValidationResults {
    pub valid: bool,
    pub template: String,
    pub kind: String,
    pub components: Vec<String>,
    /// Aliases the template's dependency annotation refers to.
    pub required_aliases: Vec<String>,
    pub bound_aliases: Vec<String>,
    pub unbound_aliases: Vec<String>,
    /// Override specs naming components the template lacks.
    pub unmatched_overrides: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidateCommand {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be loaded or any check fails.
    pub async fn execute(self, config: EngineConfig, quiet: bool) -> Result<()> {
        let template = load_template(&self.template).await?;
        let bindings = load_bindings(self.bindings.as_deref()).await?;
        let overrides = load_overrides(self.overrides.as_deref()).await?;

        let policy = config.overrides.unmatched;
        let engine = Instantiator::new(config);
        let mut results = ValidationResults {
            template: template.name().to_string(),
            kind: template.kind.to_string(),
            components: template.component_names().map(String::from).collect(),
            ..ValidationResults::default()
        };

        for descriptor in engine.dependencies(&template)? {
            let Some(alias) = descriptor.alias else {
                continue;
            };
            if bindings.get(&alias).is_some_and(|b| !b.instance.trim().is_empty()) {
                results.bound_aliases.push(alias.clone());
            } else {
                results.unbound_aliases.push(alias.clone());
            }
            results.required_aliases.push(alias);
        }

        results.unmatched_overrides = overrides
            .component_names()
            .filter(|name| template.component(name).is_none())
            .map(String::from)
            .collect();
        if policy == UnmatchedPolicy::Warn {
            for name in &results.unmatched_overrides {
                results.warnings.push(format!("override for unknown component '{name}'"));
            }
        }

        let outcome = engine.check(&template, &bindings, &overrides);
        if let Err(e) = &outcome {
            results.errors.push(e.to_string());
        }
        results.valid = outcome.is_ok();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text if !quiet => print_text(&results),
            OutputFormat::Text => {}
        }

        outcome.map_err(Into::into)
    }
}

fn print_text(results: &ValidationResults) {
    println!(
        "{} {} '{}' ({} component(s))",
        "•".blue(),
        results.kind,
        results.template,
        results.components.len()
    );

    if results.required_aliases.is_empty() {
        println!("{} No dependencies", "✓".green());
    }
    for alias in &results.bound_aliases {
        println!("{} Dependency '{}' is bound", "✓".green(), alias);
    }
    for alias in &results.unbound_aliases {
        println!("{} Dependency '{}' is not bound", "✗".red(), alias);
    }
    for warning in &results.warnings {
        println!("{} {}", "⚠".yellow(), warning);
    }
    for error in &results.errors {
        println!("{} {}", "✗".red(), error);
    }

    if results.valid {
        println!("{} Template is valid", "✓".green().bold());
    }
}
