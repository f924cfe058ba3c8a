//! Application configuration
//!
//! Split into focused sub-modules:
//! - `integrations`: Nominatim, NWS, AccuWeather
//! - `runtime`: state store, trigger, delivery, schedules
//! - `telemetry`: log output
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file
//! (`weathervane.toml` or an explicit path), then `WEATHERVANE_*`
//! environment variables with `__` between nested keys
//! (e.g. `WEATHERVANE_NWS__TIMEOUT_SECS=5`).

mod integrations;
mod runtime;
mod telemetry;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use integrations::{AccuWeatherAppConfig, GeocodingAppConfig, NwsAppConfig};
pub use runtime::{
    DeliveryConfig, DeliveryKind, ScheduleEntry, StateBackend, StateConfig, TriggerConfig,
};
pub use telemetry::TelemetryAppConfig;

/// Default configuration file name (without extension)
pub const DEFAULT_CONFIG_NAME: &str = "weathervane";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WEATHERVANE";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Nominatim geocoding configuration
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// National Weather Service configuration
    #[serde(default)]
    pub nws: NwsAppConfig,

    /// AccuWeather configuration (optional, enables current conditions)
    #[serde(default)]
    pub accuweather: Option<AccuWeatherAppConfig>,

    /// State store configuration
    #[serde(default)]
    pub state: StateConfig,

    /// Message trigger configuration
    #[serde(default)]
    pub trigger: TriggerConfig,

    /// Delivery configuration
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Recurring lookups
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,

    /// Log output configuration
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from the default file (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the result is invalid.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default file
    ///
    /// An explicit path must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the result is invalid.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let builder = config::Config::builder()
            .set_default("state.backend", "redb")?
            .set_default("delivery.kind", "console")?
            .add_source(file)
            // Override with environment variables (e.g., WEATHERVANE_STATE__PATH)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            schedules = config.schedule.len(),
            conditions = config.accuweather.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check cross-field requirements
    ///
    /// # Errors
    ///
    /// Returns a message error describing the first problem found.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.delivery.kind == DeliveryKind::Webhook
            && self
                .delivery
                .webhook_url
                .as_deref()
                .is_none_or(|url| url.trim().is_empty())
        {
            return Err(config::ConfigError::Message(
                "delivery.webhook_url is required when delivery.kind = \"webhook\"".into(),
            ));
        }

        if let Some(entry) = self
            .schedule
            .iter()
            .find(|entry| entry.place.trim().is_empty())
        {
            return Err(config::ConfigError::Message(format!(
                "schedule \"{}\" has an empty place",
                entry.name
            )));
        }

        Ok(())
    }

    /// Render the effective configuration as TOML; secrets are omitted
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.geocoding.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.nws.base_url, "https://api.weather.gov");
        assert!(config.accuweather.is_none());
        assert_eq!(config.state.backend, StateBackend::Redb);
        assert_eq!(config.delivery.kind, DeliveryKind::Console);
        assert!(config.schedule.is_empty());
        assert_eq!(config.telemetry.log_filter, "warn");
    }

    #[test]
    fn load_from_file() {
        let file = write_config(
            r#"
            [trigger]
            nickname = "relaybot"

            [state]
            backend = "memory"

            [accuweather]
            api_key = "secret-key"
            units = "metric"

            [[schedule]]
            name = "morning"
            cron = "0 0 7 * * *"
            place = "Boise"
            channel = "idaho"
            "#,
        );

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.trigger.nickname.as_deref(), Some("relaybot"));
        assert_eq!(config.state.backend, StateBackend::Memory);
        assert_eq!(config.schedule.len(), 1);
        assert!(config.accuweather.is_some());
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let result = AppConfig::load_from(Some(Path::new("/nonexistent/weathervane.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn webhook_requires_url() {
        let mut config = AppConfig::default();
        config.delivery.kind = DeliveryKind::Webhook;
        assert!(config.validate().is_err());

        config.delivery.webhook_url = Some("http://localhost:8080/say".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn schedule_needs_place() {
        let mut config = AppConfig::default();
        config.schedule.push(ScheduleEntry {
            name: "broken".into(),
            cron: "0 0 7 * * *".into(),
            place: "  ".into(),
            channel: "x".into(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_output_omits_secrets() {
        let file = write_config(
            r#"
            [accuweather]
            api_key = "secret-key"
            "#,
        );
        let config = AppConfig::load_from(Some(file.path())).unwrap();
        let rendered = config.to_toml().unwrap();
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[accuweather]"));
    }
}
