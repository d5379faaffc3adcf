//! The gateway section of a cell.
//!
//! ```yaml
//! gateway:
//!   spec:
//!     ingress:
//!       extensions:
//!         clusterIngress:
//!           host: products-1
//!           tls:
//!             secret: cust-inst--tls-secret
//!         oidc: { ... }
//!       http:
//!         - context: products-1
//!           backend: products
//!           definitions:
//!             - path: /*
//!               method: GET
//! ```

use super::Extra;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gateway {
    #[serde(default)]
    pub spec: GatewaySpec,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewaySpec {
    #[serde(default)]
    pub ingress: Ingress,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingress {
    #[serde(default)]
    pub extensions: IngressExtensions,
    /// HTTP routes exposed by the gateway, one per contributing component.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub http: Vec<HttpApi>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressExtensions {
    #[serde(default, skip_serializing_if = "ClusterIngress::is_empty")]
    pub cluster_ingress: ClusterIngress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc: Option<Oidc>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Cluster-level ingress: virtual host and TLS secret reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterIngress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsRef>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ClusterIngress {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.tls.is_none() && self.extra.is_empty()
    }
}

/// Reference to a TLS secret by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TlsRef {
    #[serde(default)]
    pub secret: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// OpenID Connect settings attached to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oidc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcr_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcr_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcr_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_claim: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secure_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_secure_paths: Vec<String>,
}

impl Oidc {
    /// True when neither a client secret nor a DCR password is set (blank counts as unset).
    #[must_use]
    pub fn lacks_client_credentials(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.client_secret) && blank(&self.dcr_password)
    }
}

/// One HTTP API route exposed through the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpApi {
    #[serde(default)]
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<HttpDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpDefinition {
    pub path: String,
    pub method: String,
}

impl HttpDefinition {
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
        }
    }
}
