//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod accuweather_adapter;
mod console_delivery;
mod nominatim_adapter;
mod nws_adapter;
mod webhook_delivery;

pub use accuweather_adapter::{AccuWeatherAdapter, UnitSystem};
pub use console_delivery::ConsoleDelivery;
pub use nominatim_adapter::NominatimGeocodingAdapter;
pub use nws_adapter::NwsAdapter;
pub use webhook_delivery::{WebhookConfig, WebhookDelivery};

use application::error::ApplicationError;
use integration_weather::WeatherError;

/// Map an upstream client error to an application error
pub(crate) fn map_weather_error(err: WeatherError) -> ApplicationError {
    match err {
        WeatherError::ConnectionFailed(e)
        | WeatherError::RequestFailed(e)
        | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
        WeatherError::ParseError(e) => {
            ApplicationError::ExternalService(format!("Unexpected response: {e}"))
        },
        WeatherError::Timeout => ApplicationError::ExternalService("Request timed out".into()),
        WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        WeatherError::Configuration(e) => ApplicationError::Configuration(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_error_connection_failed() {
        let err = WeatherError::ConnectionFailed("refused".into());
        assert!(matches!(
            map_weather_error(err),
            ApplicationError::ExternalService(_)
        ));
    }

    #[test]
    fn map_error_rate_limited() {
        assert!(matches!(
            map_weather_error(WeatherError::RateLimitExceeded),
            ApplicationError::RateLimited
        ));
    }

    #[test]
    fn map_error_configuration() {
        let err = WeatherError::Configuration("empty key".into());
        assert!(matches!(
            map_weather_error(err),
            ApplicationError::Configuration(_)
        ));
    }

    #[test]
    fn mapped_errors_are_transient_except_configuration() {
        assert!(map_weather_error(WeatherError::Timeout).is_transient());
        assert!(!map_weather_error(WeatherError::Configuration("x".into())).is_transient());
    }
}
