//! Unit templates (cells and composites).

use super::{Component, Extra, Gateway};
use crate::core::{MeshError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The two unit variants. Only cells carry a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    /// Unit exposing its components through a dedicated gateway
    Cell,
    /// Unit without a gateway
    Composite,
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cell => write!(f, "Cell"),
            Self::Composite => write!(f, "Composite"),
        }
    }
}

/// Object metadata: a name plus string annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ObjectMeta {
    /// Metadata carrying only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The `spec` section of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Gateway>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A build-time unit template.
///
/// The same type describes the finalized instance produced from it; see
/// [`FinalizedInstance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTemplate {
    pub api_version: String,
    pub kind: UnitKind,
    pub metadata: ObjectMeta,
    pub spec: UnitSpec,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A template with every override applied and its dependency annotation resolved.
pub type FinalizedInstance = UnitTemplate;

impl UnitTemplate {
    /// Name of the unit.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Look up a component by exact name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.spec.components.iter().find(|c| c.name() == name)
    }

    /// Names of all components in declaration order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.spec.components.iter().map(Component::name)
    }

    /// Check structural consistency.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidTemplate`] when a composite declares a gateway,
    /// a component has no name, or two components share a name.
    pub fn validate(&self) -> Result<()> {
        if self.kind == UnitKind::Composite && self.spec.gateway.is_some() {
            return Err(MeshError::InvalidTemplate {
                reason: format!("composite '{}' must not declare a gateway", self.name()),
            });
        }

        let mut seen = HashSet::new();
        for component in &self.spec.components {
            if component.name().is_empty() {
                return Err(MeshError::InvalidTemplate {
                    reason: format!("unit '{}' has a component without a name", self.name()),
                });
            }
            if !seen.insert(component.name()) {
                return Err(MeshError::InvalidTemplate {
                    reason: format!(
                        "unit '{}' declares component '{}' more than once",
                        self.name(),
                        component.name()
                    ),
                });
            }
        }

        Ok(())
    }
}
