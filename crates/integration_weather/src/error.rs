//! Weather integration error types

use thiserror::Error;

/// Errors that can occur while talking to an upstream weather service
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WeatherError {
    /// Map a transport-level reqwest error
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}
