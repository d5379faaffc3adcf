//! Applies web-ingress overrides to a cell gateway.
//!
//! [`apply_ingress`] is pure: it takes the current gateway and returns the updated one
//! together with the TLS [`Secret`] to emit, if any. Writing the secret is the caller's
//! job.

use crate::model::{Gateway, Secret, TlsRef};
use crate::overrides::{TlsMaterial, WebIngress};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Suffix appended to the instance name to name its TLS secret.
pub const TLS_SECRET_SUFFIX: &str = "--tls-secret";

/// Data key of the private key inside a TLS secret.
pub const TLS_KEY_ENTRY: &str = "tls.key";

/// Data key of the certificate inside a TLS secret.
pub const TLS_CERT_ENTRY: &str = "tls.crt";

/// Result of [`apply_ingress`].
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayUpdate {
    pub gateway: Gateway,
    pub secret: Option<Secret>,
}

/// Name of the TLS secret for `instance_name`.
#[must_use]
pub fn tls_secret_name(instance_name: &str) -> String {
    format!("{instance_name}{TLS_SECRET_SUFFIX}")
}

/// Apply one web-ingress override to `gateway`.
///
/// - TLS key and cert present: emit a secret named `<instance>--tls-secret` holding both
///   (base64) and point the cluster ingress at it.
/// - OIDC present: attach it to the ingress extensions.
/// - Always: set the cluster ingress host to the vhost and append the HTTP API.
#[must_use]
pub fn apply_ingress(gateway: &Gateway, instance_name: &str, ingress: &WebIngress) -> GatewayUpdate {
    let mut gateway = gateway.clone();
    let extensions = &mut gateway.spec.ingress.extensions;

    let secret = ingress.tls.as_ref().and_then(|tls| tls_secret(instance_name, tls));
    if let Some(secret) = &secret {
        debug!("Gateway TLS now references secret '{}'", secret.name());
        extensions.cluster_ingress.tls.get_or_insert_with(TlsRef::default).secret =
            secret.name().to_string();
    }

    if let Some(oidc) = &ingress.oidc {
        if oidc.lacks_client_credentials() {
            warn!(
                "OIDC for vhost '{}' has neither a client secret nor a DCR password",
                ingress.vhost
            );
        }
        extensions.oidc = Some(oidc.clone());
    }

    extensions.cluster_ingress.host = Some(ingress.vhost.clone());
    gateway.spec.ingress.http.push(ingress.http_api.clone());
    debug!(
        "Gateway host set to '{}', route '{}' appended",
        ingress.vhost, ingress.http_api.context
    );

    GatewayUpdate {
        gateway,
        secret,
    }
}

fn tls_secret(instance_name: &str, tls: &TlsMaterial) -> Option<Secret> {
    if tls.key.trim().is_empty() || tls.cert.trim().is_empty() {
        return None;
    }

    let data = BTreeMap::from([
        (TLS_KEY_ENTRY.to_string(), STANDARD.encode(tls.key.as_bytes())),
        (TLS_CERT_ENTRY.to_string(), STANDARD.encode(tls.cert.as_bytes())),
    ]);
    Some(Secret::tls(tls_secret_name(instance_name), data))
}
