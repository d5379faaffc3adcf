//! In-memory model of mesh unit templates and the artifacts derived from them.
//!
//! The model is a typed view over Kubernetes-style YAML documents. Only the fields the
//! instantiation engine reads or writes are named; everything else is captured in
//! `extra` maps (`#[serde(flatten)]`) so that a parse/serialize round trip keeps the
//! document intact.
//!
//! - [`unit`] - the template / finalized instance ([`UnitTemplate`])
//! - [`component`] - components, containers, env vars, probes and resources
//! - [`gateway`] - the cell gateway and its ingress section
//! - [`secret`] - TLS secret artifacts

pub mod component;
pub mod gateway;
pub mod secret;
pub mod unit;

pub use component::{
    Component, ComponentSpec, Container, EnvVar, PodTemplate, Probe, Quantity, ResourceRequirements,
};
pub use gateway::{
    ClusterIngress, Gateway, GatewaySpec, HttpApi, HttpDefinition, Ingress, IngressExtensions, Oidc,
    TlsRef,
};
pub use secret::Secret;
pub use unit::{FinalizedInstance, ObjectMeta, UnitKind, UnitSpec, UnitTemplate};

use std::collections::BTreeMap;

/// Fields of a document the model does not interpret.
pub type Extra = BTreeMap<String, serde_yaml::Value>;
