//! Public error types for the `flights` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;
use uuid::Uuid;

use crate::models::Violation;

/// Errors that can be returned by the `FlightsApi`.
#[derive(Error, Debug, Clone)]
pub enum FlightsError {
    /// Flight with the specified ID was not found.
    #[error("Flight not found: {id}")]
    NotFound { id: Uuid },

    /// The supplied data violates one or more constraints.
    #[error("Validation failed: {} violation(s)", violations.len())]
    Validation { violations: Vec<Violation> },

    /// The supplied version token is not an integer.
    #[error("Invalid version: '{version}'")]
    InvalidVersion { version: String },

    /// The record was changed since the supplied version was read.
    #[error("Flight {id} was modified concurrently")]
    VersionConflict { id: Uuid },

    /// An internal error occurred.
    #[error("Internal error")]
    Internal,
}

impl FlightsError {
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    #[must_use]
    pub fn validation(violations: Vec<Violation>) -> Self {
        Self::Validation { violations }
    }

    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    #[must_use]
    pub fn version_conflict(id: Uuid) -> Self {
        Self::VersionConflict { id }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
