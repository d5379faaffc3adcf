//! Integration test suite for meshcell
//!
//! End-to-end tests that run the `meshcell` binary against template, bindings and
//! override files in a scratch directory.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **instantiate**: instance and secret artifacts, dry runs, failure without output
//! - **validate**: validation reports in text and JSON
//! - **engine_config**: `meshcell.toml` lookup and its effect on commands

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;
#[path = "../fixtures/mod.rs"]
mod fixtures;

mod engine_config;
mod instantiate;
mod validate;
