//! The instantiation engine.
//!
//! [`Instantiator::instantiate`] turns a [`UnitTemplate`] into a [`FinalizedInstance`]
//! plus any TLS [`Secret`]s its ingress overrides call for. The steps run in a fixed
//! order:
//!
//! 1. Check the instance name and the template.
//! 2. Resolve the dependency annotation against the bindings and write it back with
//!    instance names. The unit takes the instance name.
//! 3. For every component that has an override spec (exact name match):
//!    env merge and placeholder substitution (all containers), probe merge and resource
//!    merge (primary container), then the gateway merge when the unit has a gateway.
//!
//! Components without an override spec pass through unchanged. Every override is
//! checked against its component before the first change is made, so a failing call
//! never returns a half-merged instance. The caller's template is not modified.

pub mod placeholder;

use crate::config::{EngineConfig, UnmatchedPolicy};
use crate::core::{MeshError, Result};
use crate::gateway;
use crate::model::{Component, FinalizedInstance, Gateway, Secret, UnitTemplate};
use crate::overrides::{OverrideRegistry, OverrideSpec};
use crate::resolver::{
    self, DependencyBindings, DependencyDescriptor, Resolution, ResolvedAlias, annotation,
};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Longest allowed instance name (RFC 1123 label).
pub const MAX_INSTANCE_NAME_LEN: usize = 63;

static INSTANCE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("instance name pattern is valid")
});

/// Run-time inputs of one instantiation.
#[derive(Debug, Clone, Default)]
pub struct InstantiationRequest {
    pub instance_name: String,
    pub bindings: DependencyBindings,
    pub overrides: OverrideRegistry,
}

impl InstantiationRequest {
    #[must_use]
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: DependencyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: OverrideRegistry) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Output of [`Instantiator::instantiate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Instantiation {
    pub instance: FinalizedInstance,
    /// At most one per secret name, in the order the components produced them.
    pub secrets: Vec<Secret>,
}

/// Check that `name` can be used as an instance name.
///
/// # Errors
///
/// Returns [`MeshError::InvalidInstanceName`] unless `name` is a lowercase RFC 1123 label.
pub fn validate_instance_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| MeshError::InvalidInstanceName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.len() > MAX_INSTANCE_NAME_LEN {
        return Err(invalid("name is longer than 63 characters"));
    }

    if !INSTANCE_NAME_REGEX.is_match(name) {
        return Err(invalid(
            "use lowercase letters, digits and '-', starting and ending with a letter or digit",
        ));
    }
    Ok(())
}

/// Applies run-time inputs to unit templates.
#[derive(Debug, Clone, Default)]
pub struct Instantiator {
    config: EngineConfig,
}

impl Instantiator {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
        }
    }

    /// Produce the finalized instance of `template` for `request`.
    ///
    /// # Errors
    ///
    /// Any [`MeshError`] of kind `Configuration`: invalid instance name or template,
    /// malformed annotation, unbound alias, an override that does not fit its
    /// component, or an unmatched override under [`UnmatchedPolicy::Error`].
    pub fn instantiate(
        &self,
        template: &UnitTemplate,
        request: &InstantiationRequest,
    ) -> Result<Instantiation> {
        let instance_name = request.instance_name.as_str();
        validate_instance_name(instance_name)?;
        let resolution = self.prepare(template, &request.bindings, &request.overrides)?;

        let key = self.config.annotations.dependencies.as_str();
        let raw_annotation = template.metadata.annotations.get(key);
        let mut instance = template.clone();
        instance.metadata.name = instance_name.to_string();
        if raw_annotation.is_some() {
            let encoded = annotation::encode(key, &resolution.descriptors)?;
            instance.metadata.annotations.insert(key.to_string(), encoded);
        }

        let mut secrets = Vec::new();
        let mut gateway = instance.spec.gateway.take();
        for component in &mut instance.spec.components {
            let Some(spec) = request.overrides.get(component.name()) else {
                debug!("No overrides for component '{}'", component.name());
                continue;
            };

            merge_env(component, spec, instance_name, &resolution.aliases);
            merge_probes(component, spec)?;
            merge_resources(component, spec)?;
            if let Some(secret) = merge_gateway(gateway.as_mut(), component, spec, instance_name) {
                push_secret(&mut secrets, secret);
            }
        }
        instance.spec.gateway = gateway;

        info!(
            "Instantiated {} '{}' as '{}' ({} dependencies, {} secrets)",
            template.kind,
            template.name(),
            instance_name,
            resolution.descriptors.len(),
            secrets.len()
        );

        Ok(Instantiation {
            instance,
            secrets,
        })
    }

    /// Run every check [`Self::instantiate`] runs before it changes anything.
    ///
    /// # Errors
    ///
    /// Same as [`Self::instantiate`], minus the instance name check.
    pub fn check(
        &self,
        template: &UnitTemplate,
        bindings: &DependencyBindings,
        overrides: &OverrideRegistry,
    ) -> Result<()> {
        self.prepare(template, bindings, overrides).map(|_| ())
    }

    /// Dependencies the template declares, as recorded in its annotation.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::MalformedAnnotation`] if the annotation does not decode.
    pub fn dependencies(&self, template: &UnitTemplate) -> Result<Vec<DependencyDescriptor>> {
        let key = self.config.annotations.dependencies.as_str();
        annotation::decode(key, template.metadata.annotations.get(key).map(String::as_str))
    }

    fn prepare(
        &self,
        template: &UnitTemplate,
        bindings: &DependencyBindings,
        overrides: &OverrideRegistry,
    ) -> Result<Resolution> {
        template.validate()?;
        let resolution = resolver::resolve(&self.dependencies(template)?, bindings)?;

        self.check_unmatched(template, overrides)?;
        for component in &template.spec.components {
            if let Some(spec) = overrides.get(component.name()) {
                check_override_fits(component, spec)?;
            }
        }
        Ok(resolution)
    }

    fn check_unmatched(&self, template: &UnitTemplate, overrides: &OverrideRegistry) -> Result<()> {
        let policy = self.config.overrides.unmatched;
        for name in overrides.component_names().filter(|n| template.component(n).is_none()) {
            match policy {
                UnmatchedPolicy::Error => {
                    return Err(MeshError::UnmatchedOverride {
                        component: name.to_string(),
                    });
                }
                UnmatchedPolicy::Warn => {
                    warn!("Override for '{}' matches no component of '{}'", name, template.name());
                }
                UnmatchedPolicy::Ignore => {
                    debug!("Ignoring override for unknown component '{}'", name);
                }
            }
        }
        Ok(())
    }
}

/// Index of the container probe and resource overrides apply to, if the override needs one.
fn override_target(component: &Component, spec: &OverrideSpec) -> Result<Option<usize>> {
    if !spec.touches_probes() && spec.resources.is_none() {
        return Ok(None);
    }
    component
        .primary_container_index()
        .map(Some)
        .ok_or_else(|| MeshError::NoPrimaryContainer {
            component: component.name().to_string(),
        })
}

fn check_override_fits(component: &Component, spec: &OverrideSpec) -> Result<()> {
    let Some(index) = override_target(component, spec)? else {
        return Ok(());
    };
    let container = &component.containers()[index];

    let missing = |probe: &str| MeshError::MissingProbe {
        component: component.name().to_string(),
        container: container.name.clone(),
        probe: probe.to_string(),
    };
    if spec.liveness.is_some() && container.liveness_probe.is_none() {
        return Err(missing("liveness"));
    }
    if spec.readiness.is_some() && container.readiness_probe.is_none() {
        return Err(missing("readiness"));
    }
    Ok(())
}

fn merge_env(
    component: &mut Component,
    spec: &OverrideSpec,
    instance_name: &str,
    aliases: &[ResolvedAlias],
) {
    let component_name = component.name().to_string();
    let mut declared = BTreeSet::new();

    for container in component.containers_mut() {
        for var in &mut container.env {
            declared.insert(var.name.clone());
            let Some(current) = var.value.as_mut() else {
                if spec.env_value(&var.name).is_some() {
                    warn!(
                        "Env var '{}' of component '{}' has no literal value; override not applied",
                        var.name, component_name
                    );
                }
                continue;
            };
            if let Some(value) = spec.env_value(&var.name) {
                *current = value.to_string();
            }

            let resolved = placeholder::substitute(current, instance_name, aliases);
            debug!(
                "Env {}/{}/{}: '{}' -> '{}'",
                component_name, container.name, var.name, current, resolved
            );
            if resolved.is_empty() {
                warn!(
                    "Env var '{}' of component '{}' resolved to an empty value",
                    var.name, component_name
                );
            }
            *current = resolved;
        }
    }

    if let Some(env) = &spec.env {
        for name in env.keys().filter(|n| !declared.contains(*n)) {
            warn!("Env override '{}' is not declared by component '{}'", name, component_name);
        }
    }
}

fn merge_probes(component: &mut Component, spec: &OverrideSpec) -> Result<()> {
    if !spec.touches_probes() {
        return Ok(());
    }
    let Some(index) = override_target(component, spec)? else {
        return Ok(());
    };
    let container = &mut component.containers_mut()[index];

    if let (Some(tuning), Some(probe)) = (&spec.liveness, container.liveness_probe.as_mut()) {
        tuning.apply_to(probe);
    }
    if let (Some(tuning), Some(probe)) = (&spec.readiness, container.readiness_probe.as_mut()) {
        tuning.apply_to(probe);
    }
    Ok(())
}

fn merge_resources(component: &mut Component, spec: &OverrideSpec) -> Result<()> {
    let Some(resources) = &spec.resources else {
        return Ok(());
    };
    if let Some(index) = override_target(component, spec)? {
        component.containers_mut()[index].resources = Some(resources.clone());
    }
    Ok(())
}

fn merge_gateway(
    gateway: Option<&mut Gateway>,
    component: &Component,
    spec: &OverrideSpec,
    instance_name: &str,
) -> Option<Secret> {
    let ingress = spec.ingress.as_ref()?;
    let Some(gateway) = gateway else {
        debug!(
            "Unit has no gateway; web-ingress override of '{}' not applied",
            component.name()
        );
        return None;
    };

    let update = gateway::apply_ingress(gateway, instance_name, ingress);
    *gateway = update.gateway;
    update.secret
}

fn push_secret(secrets: &mut Vec<Secret>, secret: Secret) {
    if let Some(existing) = secrets.iter_mut().find(|s| s.name() == secret.name()) {
        warn!("TLS secret '{}' supplied more than once; keeping the last", secret.name());
        *existing = secret;
    } else {
        secrets.push(secret);
    }
}
