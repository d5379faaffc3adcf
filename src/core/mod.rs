//! Core types shared by every meshcell module.
//!
//! - [`error`] - [`MeshError`], its [`ErrorKind`] classification and the
//!   [`ErrorContext`] used to present failures to CLI users

pub mod error;

pub use error::{ErrorContext, ErrorKind, MeshError, user_friendly_error};

/// Result alias for operations that fail with a [`MeshError`].
pub type Result<T, E = MeshError> = std::result::Result<T, E>;
