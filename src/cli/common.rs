//! Input loading shared by the commands.

use crate::codec;
use crate::model::UnitTemplate;
use crate::overrides::OverrideRegistry;
use crate::resolver::DependencyBindings;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Read and parse a template file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid unit template.
pub async fn load_template(path: &Path) -> Result<UnitTemplate> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("Failed to read template {}", path.display()))?;
    let template = codec::parse_template(&bytes, &path.display().to_string())?;
    debug!(
        "Loaded {} '{}' with {} component(s) from {}",
        template.kind,
        template.name(),
        template.spec.components.len(),
        path.display()
    );
    Ok(template)
}

/// Read a bindings file, or no bindings when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a bindings map.
pub async fn load_bindings(path: Option<&Path>) -> Result<DependencyBindings> {
    let Some(path) = path else {
        return Ok(DependencyBindings::new());
    };
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read bindings {}", path.display()))?;
    let bindings = DependencyBindings::from_yaml_str(&content)?;
    debug!("Loaded {} binding(s) from {}", bindings.len(), path.display());
    Ok(bindings)
}

/// Read an override file, or no overrides when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any override is invalid.
pub async fn load_overrides(path: Option<&Path>) -> Result<OverrideRegistry> {
    let Some(path) = path else {
        return Ok(OverrideRegistry::new());
    };
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read overrides {}", path.display()))?;
    let overrides = OverrideRegistry::from_yaml_str(&content)?;
    debug!("Loaded overrides for {} component(s) from {}", overrides.len(), path.display());
    Ok(overrides)
}
