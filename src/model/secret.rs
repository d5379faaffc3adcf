//! Secret artifacts emitted next to the finalized instance.

use super::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Secret type used for gateway TLS material.
pub const TLS_SECRET_TYPE: &str = "kubernetes.io/tls";

/// A Kubernetes `Secret` document. `data` values are base64-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl Secret {
    /// A TLS secret with already-encoded data.
    #[must_use]
    pub fn tls(name: impl Into<String>, data: BTreeMap<String, String>) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "Secret".to_string(),
            metadata: ObjectMeta::named(name),
            secret_type: Some(TLS_SECRET_TYPE.to_string()),
            data,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}
