//! Error handling for meshcell
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`MeshError`]) for everything the engine and its
//!    collaborators can fail on, so callers can match on the failure
//! 2. **User-friendly messages** ([`ErrorContext`]) with details and an actionable
//!    suggestion when an error reaches the CLI
//!
//! # Error Categories
//!
//! Every variant belongs to one [`ErrorKind`]:
//! - **Configuration**: the inputs cannot produce an instance. Unresolved dependency
//!   aliases, malformed overrides, a malformed dependency annotation, an invalid
//!   instance name. Raised before any artifact is written.
//! - **Io**: an artifact could not be persisted. Always carries the destination path.
//! - **Internal**: serialization failures and other conditions that indicate a bug or
//!   an environment problem rather than bad input.
//!
//! Warnings (empty environment values, OIDC without credentials) are never errors;
//! they are emitted through `tracing` and processing continues.
//!
//! # Examples
//!
//! ```rust,no_run
//! use meshcell::core::{MeshError, user_friendly_error};
//!
//! let error = MeshError::UnresolvedDependency {
//!     alias: "stockCompDep".to_string(),
//! };
//! assert!(error.is_configuration_error());
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Broad classification of a [`MeshError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or inconsistent input; fatal before any output is produced.
    Configuration,
    /// Persisting an artifact failed.
    Io,
    /// Anything else (serialization bugs, unexpected states).
    Internal,
}

/// The main error type for meshcell operations.
#[derive(Error, Debug, Clone)]
pub enum MeshError {
    /// A dependency alias from the template annotation has no binding.
    ///
    /// Every descriptor in the dependency annotation must resolve to a concrete
    /// instance name before the annotation can be rewritten.
    #[error("Dependency alias '{alias}' is not bound to any instance")]
    UnresolvedDependency {
        /// The alias that could not be resolved
        alias: String,
    },

    /// The dependency annotation on the template could not be decoded.
    #[error("Malformed dependency annotation '{key}': {reason}")]
    MalformedAnnotation {
        /// Annotation key that holds the descriptor list
        key: String,
        /// Decoder error
        reason: String,
    },

    /// An override declaration for a component is malformed or of an unknown kind.
    #[error("Invalid override for component '{component}': {reason}")]
    InvalidOverride {
        /// Component the override was declared for
        component: String,
        /// Why the override was rejected
        reason: String,
    },

    /// An override names a component the template does not declare and the
    /// configured policy rejects that.
    #[error("Override targets component '{component}' which the template does not declare")]
    UnmatchedOverride {
        /// The component name from the override registry
        component: String,
    },

    /// A probe override targets a container that has no probe of that kind.
    #[error(
        "Component '{component}' overrides the {probe} probe, but container '{container}' declares none"
    )]
    MissingProbe {
        /// Component being instantiated
        component: String,
        /// Container that lacks the probe
        container: String,
        /// `liveness` or `readiness`
        probe: String,
    },

    /// Probe or resource overrides need a primary container and none could be chosen.
    #[error("Component '{component}' has no container named after it and more than one container")]
    NoPrimaryContainer {
        /// Component being instantiated
        component: String,
    },

    /// The requested instance name cannot be used as a resource name.
    #[error("Invalid instance name '{name}': {reason}")]
    InvalidInstanceName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The template document could not be parsed.
    #[error("Invalid template syntax in {file}")]
    TemplateParseError {
        /// Template path, or `<memory>` for in-memory documents
        file: String,
        /// Parser error
        reason: String,
    },

    /// The template parsed but is structurally inconsistent.
    #[error("Invalid template: {reason}")]
    InvalidTemplate {
        /// What is wrong with the template
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// An artifact could not be written to its destination.
    #[error("Failed to persist {path}: {reason}")]
    PersistFailed {
        /// Destination path of the artifact
        path: String,
        /// Underlying IO failure
        reason: String,
    },

    /// An artifact could not be serialized.
    #[error("Failed to serialize {artifact}: {reason}")]
    SerializeFailed {
        /// Artifact name
        artifact: String,
        /// Serializer error
        reason: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl MeshError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnresolvedDependency {
                ..
            }
            | Self::MalformedAnnotation {
                ..
            }
            | Self::InvalidOverride {
                ..
            }
            | Self::UnmatchedOverride {
                ..
            }
            | Self::MissingProbe {
                ..
            }
            | Self::NoPrimaryContainer {
                ..
            }
            | Self::InvalidInstanceName {
                ..
            }
            | Self::TemplateParseError {
                ..
            }
            | Self::InvalidTemplate {
                ..
            }
            | Self::ConfigError {
                ..
            } => ErrorKind::Configuration,
            Self::PersistFailed {
                ..
            } => ErrorKind::Io,
            Self::SerializeFailed {
                ..
            }
            | Self::Other {
                ..
            } => ErrorKind::Internal,
        }
    }

    /// Whether this error is a configuration error.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Configuration)
    }

    pub(crate) fn invalid_override(component: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOverride {
            component: component.to_string(),
            reason: reason.into(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: MeshError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: MeshError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`MeshError`] anywhere in the `anyhow` chain and [`std::io::Error`];
/// anything else is wrapped as [`MeshError::Other`] with the full context chain as
/// its message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(mesh_error) = cause.downcast_ref::<MeshError>() {
            let ctx = create_error_context(mesh_error.clone());
            // Keep the outer anyhow context visible when there is one
            if error.chain().count() > 1 && ctx.details.is_none() {
                return ctx.with_details(format!("{error:#}"));
            }
            return ctx;
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorContext::new(MeshError::Other {
                message: format!("{error:#}"),
            })
            .with_suggestion("Check the permissions of the output directory and input files"),
            std::io::ErrorKind::NotFound => ErrorContext::new(MeshError::Other {
                message: format!("{error:#}"),
            })
            .with_suggestion("Check that the file or directory exists and the path is correct"),
            _ => ErrorContext::new(MeshError::Other {
                message: format!("{error:#}"),
            }),
        };
    }

    ErrorContext::new(MeshError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: MeshError) -> ErrorContext {
    match &error {
        MeshError::UnresolvedDependency {
            alias,
        } => {
            let suggestion = format!(
                "Add a binding for '{alias}' to the bindings file, e.g.\n  {alias}:\n    org: <org>\n    name: <image>\n    version: <version>\n    instance: <running-instance>"
            );
            ErrorContext::new(error)
                .with_details("Every dependency declared by the template must point at an existing instance")
                .with_suggestion(suggestion)
        }
        MeshError::MalformedAnnotation {
            ..
        } => ErrorContext::new(error)
            .with_details("The dependency annotation must be a JSON list of {org, name, version, alias} records")
            .with_suggestion("Rebuild the template; this annotation is written by the build step and should not be edited by hand"),
        MeshError::InvalidOverride {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Supported override kinds are: env, probes, resources, web-ingress"),
        MeshError::UnmatchedOverride {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Fix the component name, or set `overrides.unmatched = \"warn\"` in meshcell.toml to ignore it",
        ),
        MeshError::MissingProbe {
            ..
        } => ErrorContext::new(error)
            .with_details("Probe overrides only tune timing fields; the probe action comes from the template")
            .with_suggestion("Declare the probe in the template or drop it from the override"),
        MeshError::InvalidInstanceName {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Use lowercase letters, digits and '-', starting and ending with an alphanumeric (max 63 characters)",
        ),
        MeshError::TemplateParseError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check the YAML syntax of the template document")
        }
        MeshError::PersistFailed {
            ..
        } => ErrorContext::new(error)
            .with_details("No artifact of this instantiation was left in place")
            .with_suggestion("Check that the output directory is writable and has free space"),
        _ => ErrorContext::new(error),
    }
}
