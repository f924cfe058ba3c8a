//! Shared response handling for the upstream clients

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::WeatherError;

/// Turn a non-success status into the matching error
pub(crate) fn check_status(response: Response) -> Result<Response, WeatherError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(WeatherError::RateLimitExceeded);
    }
    if status.is_server_error() {
        return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
    }
    if !status.is_success() {
        return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
    }
    Ok(response)
}

/// Check the status, then decode the JSON body
pub(crate) async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T, WeatherError> {
    check_status(response)?
        .json()
        .await
        .map_err(|e| WeatherError::ParseError(e.to_string()))
}
