//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Reading or writing the persisted pipeline state failed
    #[error("State store error: {0}")]
    StateStore(String),

    /// Handing a result to the delivery channel failed
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error came from a transient upstream condition
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ExternalService(_))
    }
}
