//! Dependency alias resolution.
//!
//! A template refers to the other units it depends on through aliases
//! (`{{stockCompDep}}`). At instantiation time the caller supplies
//! [`DependencyBindings`] mapping each alias to a running instance. [`resolve`] turns
//! the template's [`DependencyDescriptor`]s into resolved descriptors (instance set,
//! alias cleared) and keeps the alias → instance pairs needed for placeholder
//! substitution in [`Resolution`].
//!
//! Resolution is all-or-nothing: the first unbound alias aborts it with
//! [`MeshError::UnresolvedDependency`].

pub mod annotation;

use crate::core::{MeshError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// One dependency of a unit, as recorded in its dependency annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDescriptor {
    /// Build-time correlation key; `None` once resolved.
    pub alias: Option<String>,
    pub org: String,
    pub name: String,
    pub version: String,
    /// Concrete instance name; `None` until resolved.
    pub instance: Option<String>,
    /// `Cell` or `Composite`, when the build step recorded it.
    pub kind: Option<String>,
}

impl DependencyDescriptor {
    /// `org/name:version`
    #[must_use]
    pub fn image(&self) -> String {
        format!("{}/{}:{}", self.org, self.name, self.version)
    }
}

/// Fully-qualified identity of an existing instance a dependency is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyIdentity {
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub instance: String,
}

impl DependencyIdentity {
    #[must_use]
    pub fn new(
        org: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            org: org.into(),
            name: name.into(),
            version: version.into(),
            instance: instance.into(),
        }
    }
}

/// Alias → identity map supplied at run time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyBindings {
    bindings: BTreeMap<String, DependencyIdentity>,
}

impl DependencyBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bindings document (`{alias: {org, name, version, instance}}`).
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::ConfigError`] if the document is not a valid bindings map.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| MeshError::ConfigError {
            message: format!("invalid dependency bindings: {e}"),
        })
    }

    /// Add a binding (builder style).
    #[must_use]
    pub fn with(mut self, alias: impl Into<String>, identity: DependencyIdentity) -> Self {
        self.insert(alias, identity);
        self
    }

    pub fn insert(&mut self, alias: impl Into<String>, identity: DependencyIdentity) {
        self.bindings.insert(alias.into(), identity);
    }

    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&DependencyIdentity> {
        self.bindings.get(alias)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// An alias and the instance it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAlias {
    pub alias: String,
    pub instance: String,
}

impl ResolvedAlias {
    /// The `{{alias}}` token this alias is referenced by.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.alias)
    }
}

/// Output of [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Descriptors with `instance` set and `alias` cleared, in template order.
    pub descriptors: Vec<DependencyDescriptor>,
    /// Alias → instance pairs, in template order.
    pub aliases: Vec<ResolvedAlias>,
}

/// Resolve every descriptor against `bindings`.
///
/// # Errors
///
/// Returns [`MeshError::UnresolvedDependency`] for the first descriptor whose alias is
/// missing, unbound, or bound to an empty instance name.
pub fn resolve(
    descriptors: &[DependencyDescriptor],
    bindings: &DependencyBindings,
) -> Result<Resolution> {
    let mut resolution = Resolution::default();
    let mut used = BTreeSet::new();

    for descriptor in descriptors {
        if descriptor.alias.is_none()
            && let Some(instance) = &descriptor.instance
        {
            // Already resolved by an earlier pass; nothing to correlate.
            debug!("Dependency {} already resolved to '{}'", descriptor.image(), instance);
            resolution.descriptors.push(descriptor.clone());
            continue;
        }

        let alias = descriptor.alias.as_deref().unwrap_or_default();
        let identity = bindings
            .get(alias)
            .filter(|identity| !identity.instance.trim().is_empty())
            .ok_or_else(|| MeshError::UnresolvedDependency {
                alias: alias.to_string(),
            })?;
        used.insert(alias);

        warn_on_identity_mismatch(alias, descriptor, identity);
        debug!("Resolved dependency '{}' ({}) to instance '{}'", alias, descriptor.image(), identity.instance);

        resolution.aliases.push(ResolvedAlias {
            alias: alias.to_string(),
            instance: identity.instance.clone(),
        });
        resolution.descriptors.push(DependencyDescriptor {
            alias: None,
            instance: Some(identity.instance.clone()),
            ..descriptor.clone()
        });
    }

    for alias in bindings.aliases().filter(|a| !used.contains(a)) {
        debug!("Binding '{}' is not referenced by the template's dependencies", alias);
    }

    Ok(resolution)
}

fn warn_on_identity_mismatch(
    alias: &str,
    descriptor: &DependencyDescriptor,
    identity: &DependencyIdentity,
) {
    let differs = |bound: &str, expected: &str| !bound.is_empty() && bound != expected;
    if differs(&identity.org, &descriptor.org)
        || differs(&identity.name, &descriptor.name)
        || differs(&identity.version, &descriptor.version)
    {
        warn!(
            "Binding for '{}' points at {}/{}:{} but the template expects {}",
            alias,
            identity.org,
            identity.name,
            identity.version,
            descriptor.image()
        );
    }
}
