//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Coordinate text could not be turned into a lookup key
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("place name must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Validation failed: place name must not be empty"
        );
    }

    #[test]
    fn invalid_coordinate_message() {
        let err = DomainError::InvalidCoordinate("lat missing".to_string());
        assert_eq!(err.to_string(), "Invalid coordinate: lat missing");
    }
}
