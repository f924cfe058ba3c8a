//! Upstream service configurations: Nominatim, NWS, AccuWeather.

use integration_weather::AccuWeatherConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::adapters::UnitSystem;

pub use integration_weather::{NominatimConfig as GeocodingAppConfig, NwsConfig as NwsAppConfig};

// ==============================
// AccuWeather Configuration
// ==============================

/// AccuWeather configuration (enables the current-conditions stage)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuWeatherAppConfig {
    /// API key (sensitive - uses `SecretString`)
    #[serde(skip_serializing)]
    pub api_key: SecretString,

    /// Which unit system to report
    #[serde(default)]
    pub units: UnitSystem,

    /// API base URL
    #[serde(default = "default_accuweather_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_accuweather_timeout")]
    pub timeout_secs: u64,
}

fn default_accuweather_base_url() -> String {
    "https://dataservice.accuweather.com".to_string()
}

const fn default_accuweather_timeout() -> u64 {
    15
}

impl AccuWeatherAppConfig {
    /// Convert to the client configuration
    #[must_use]
    pub fn to_client_config(&self) -> AccuWeatherConfig {
        AccuWeatherConfig {
            api_key: self.api_key.expose_secret().to_string(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}
