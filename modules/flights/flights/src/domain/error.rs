use flights_sdk::{FlightsError, Violation};
use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Flight not found: {id}")]
    NotFound { id: Uuid },

    #[error("Validation failed: {} violation(s)", violations.len())]
    Validation { violations: Vec<Violation> },

    #[error("Invalid version: '{version}'")]
    InvalidVersion { version: String },

    #[error("Flight {id} was modified concurrently (expected version {expected})")]
    VersionConflict { id: Uuid, expected: i32 },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(violations: Vec<Violation>) -> Self {
        Self::Validation { violations }
    }

    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    pub fn version_conflict(id: Uuid, expected: i32) -> Self {
        Self::VersionConflict { id, expected }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::database(e.to_string())
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for FlightsError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::NotFound { id } => FlightsError::not_found(id),
            DomainError::Validation { violations } => FlightsError::validation(violations),
            DomainError::InvalidVersion { version } => FlightsError::invalid_version(version),
            DomainError::VersionConflict { id, .. } => FlightsError::version_conflict(id),
            DomainError::Database { .. } => FlightsError::internal(),
        }
    }
}
