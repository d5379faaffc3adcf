//! Configuration management for meshcell.
//!
//! The engine reads one optional TOML file (`meshcell.toml`), see [`engine`]. Run-time
//! inputs (bindings, overrides) are documents of their own and live in
//! [`crate::resolver`] and [`crate::overrides`].

pub mod engine;

pub use engine::{
    AnnotationsConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, DEFAULT_DEPENDENCIES_ANNOTATION,
    EngineConfig, OutputConfig, OverridesConfig, UnmatchedPolicy,
};
