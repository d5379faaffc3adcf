//! Engine configuration (`meshcell.toml`).
//!
//! ```toml
//! [output]
//! dir = "deploy/instances"
//!
//! [overrides]
//! unmatched = "error"   # warn | ignore | error
//!
//! [annotations]
//! dependencies = "mesh.cellery.io/cell-dependencies"
//! ```
//!
//! Every key is optional. A missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Environment variable naming the config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "MESHCELL_CONFIG";

/// Config file looked up in the working directory as a last resort.
pub const DEFAULT_CONFIG_FILE: &str = "meshcell.toml";

/// Default annotation key holding a unit's dependency descriptors.
pub const DEFAULT_DEPENDENCIES_ANNOTATION: &str = "mesh.cellery.io/cell-dependencies";

fn default_output_dir() -> PathBuf {
    PathBuf::from("target").join("meshcell")
}

fn default_dependencies_annotation() -> String {
    DEFAULT_DEPENDENCIES_ANNOTATION.to_string()
}

/// What to do with an override naming a component the template does not declare.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Log a warning and continue
    #[default]
    Warn,
    /// Continue silently
    Ignore,
    /// Fail the instantiation
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory the finalized instance and secrets are written to.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverridesConfig {
    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationsConfig {
    /// Annotation key of the dependency descriptor list.
    #[serde(default = "default_dependencies_annotation")]
    pub dependencies: String,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            dependencies: default_dependencies_annotation(),
        }
    }
}

/// Settings of the instantiation engine and the CLI around it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub overrides: OverridesConfig,
    #[serde(default)]
    pub annotations: AnnotationsConfig,
}

impl EngineConfig {
    /// Load the config the way the CLI does.
    ///
    /// Lookup order: `explicit` (must exist), then the path in `MESHCELL_CONFIG` (must
    /// exist), then `meshcell.toml` in `working_dir` if present, then defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file is missing, unreadable or not valid config.
    pub async fn load_with_optional(explicit: Option<PathBuf>, working_dir: &Path) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        match Self::locate(explicit, from_env, working_dir) {
            Some(path) => Self::load_from(&path).await,
            None => {
                debug!("No engine config found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Pick the config file to read, if any.
    #[must_use]
    pub fn locate(
        explicit: Option<PathBuf>,
        from_env: Option<PathBuf>,
        working_dir: &Path,
    ) -> Option<PathBuf> {
        explicit.or(from_env).or_else(|| {
            let local = working_dir.join(DEFAULT_CONFIG_FILE);
            local.is_file().then_some(local)
        })
    }

    /// Load config from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read engine config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse engine config from {}", path.display()))?;
        debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }
}
