//! Test utilities for meshcell
//!
//! Logging setup and sample templates for unit and integration tests. Available to
//! integration tests through the `test-utils` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use meshcell::instantiate::{InstantiationRequest, Instantiator};
//! use meshcell::test_utils::{hr_bindings, hr_composite, init_test_logging};
//!
//! init_test_logging(None);
//! let request = InstantiationRequest::new("hr-inst").with_bindings(hr_bindings());
//! let result = Instantiator::default().instantiate(&hr_composite(), &request).unwrap();
//! assert_eq!(result.instance.name(), "hr-inst");
//! ```

pub mod fixtures;

pub use fixtures::{
    DEPENDENCIES_ANNOTATION, HR_COMPOSITE_YAML, PRODUCTS_CELL_YAML, hr_bindings, hr_composite,
    products_cell, products_ingress,
};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Runs once per process. Uses `level` when given, otherwise `RUST_LOG`; with neither,
/// logging stays off.
///
/// ```bash
/// RUST_LOG=meshcell=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
