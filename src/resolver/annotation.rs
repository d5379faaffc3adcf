//! Wire format of the dependency annotation.
//!
//! The annotation value is a JSON array serialized into a single string:
//!
//! ```json
//! [{"org":"myorg","name":"stock-comp","version":"1.0.0","alias":"stockCompDep","kind":"Composite"}]
//! ```
//!
//! After resolution the same records carry `instance` and no `alias`. Other tooling
//! parses this string on its own, so the key names and their order are fixed here and
//! nowhere else. The rest of the crate only sees [`DependencyDescriptor`].

use super::DependencyDescriptor;
use crate::core::{MeshError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    #[serde(default)]
    org: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

impl From<Record> for DependencyDescriptor {
    fn from(r: Record) -> Self {
        Self {
            alias: r.alias.filter(|a| !a.is_empty()),
            org: r.org,
            name: r.name,
            version: r.version,
            instance: r.instance.filter(|i| !i.is_empty()),
            kind: r.kind,
        }
    }
}

impl From<&DependencyDescriptor> for Record {
    fn from(d: &DependencyDescriptor) -> Self {
        Self {
            org: d.org.clone(),
            name: d.name.clone(),
            version: d.version.clone(),
            instance: d.instance.clone(),
            alias: d.alias.clone(),
            kind: d.kind.clone(),
        }
    }
}

/// Decode the annotation value stored under `key`.
///
/// A missing, blank or `null` value means the unit has no dependencies.
///
/// # Errors
///
/// Returns [`MeshError::MalformedAnnotation`] if the value is not a JSON array of
/// dependency records.
pub fn decode(key: &str, raw: Option<&str>) -> Result<Vec<DependencyDescriptor>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty() && *r != "null") else {
        return Ok(Vec::new());
    };

    let records: Vec<Record> =
        serde_json::from_str(raw).map_err(|e| MeshError::MalformedAnnotation {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    Ok(records.into_iter().map(DependencyDescriptor::from).collect())
}

/// Encode descriptors back into the annotation value.
///
/// # Errors
///
/// Returns [`MeshError::SerializeFailed`] if JSON encoding fails.
pub fn encode(key: &str, descriptors: &[DependencyDescriptor]) -> Result<String> {
    let records: Vec<Record> = descriptors.iter().map(Record::from).collect();
    serde_json::to_string(&records).map_err(|e| MeshError::SerializeFailed {
        artifact: format!("annotation '{key}'"),
        reason: e.to_string(),
    })
}
