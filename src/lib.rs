//! meshcell - instantiation engine for mesh cells and composites
//!
//! A *template* describes a deployable unit: a **Cell** (components exposed through a
//! gateway) or a **Composite** (components without a gateway). Instantiating a
//! template produces a named *instance*:
//!
//! - dependency aliases recorded in the template's annotation are bound to running
//!   instances and written back as instance names;
//! - `{{alias}}` and `{{instance_name}}` placeholders in env values are substituted;
//! - per-component overrides adjust env vars, probe tuning, resources and gateway
//!   ingress (with an optional TLS secret).
//!
//! # Architecture
//!
//! - [`model`] - typed view of template documents
//! - [`resolver`] - dependency annotation codec and alias resolution
//! - [`overrides`] - run-time override registry, validated on load
//! - [`gateway`] - ingress merge for cells
//! - [`instantiate`] - the engine tying the above together
//! - [`codec`] / [`persist`] - YAML encoding and all-or-nothing artifact writes
//! - [`config`] - `meshcell.toml`
//! - [`cli`] - the `meshcell` binary
//!
//! # Example
//!
//! ```rust,no_run
//! use meshcell::codec;
//! use meshcell::instantiate::{InstantiationRequest, Instantiator};
//! use meshcell::resolver::{DependencyBindings, DependencyIdentity};
//!
//! # fn example(bytes: &[u8]) -> meshcell::core::Result<()> {
//! let template = codec::parse_template(bytes, "hr.yaml")?;
//! let bindings = DependencyBindings::new().with(
//!     "stockCompDep",
//!     DependencyIdentity::new("myorg", "stock-comp", "1.0.0", "stock-inst"),
//! );
//! let request = InstantiationRequest::new("hr-inst").with_bindings(bindings);
//! let result = Instantiator::default().instantiate(&template, &request)?;
//! println!("{}", codec::serialize_instance(&result.instance)?);
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod core;
pub mod instantiate;
pub mod resolver;

// Documents
pub mod codec;
pub mod model;
pub mod persist;

// Merge steps
pub mod gateway;
pub mod overrides;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
