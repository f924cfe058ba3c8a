//! AccuWeather client
//!
//! Secondary provider used to enrich a forecast with observed conditions.
//! A place name is first resolved to an AccuWeather location key, which is
//! then used for the current-conditions call.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::WeatherError;
use crate::http::json_body;

/// AccuWeather client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AccuWeatherConfig {
    /// API key issued by the AccuWeather developer portal
    pub api_key: String,

    /// API base URL (default: <https://dataservice.accuweather.com>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://dataservice.accuweather.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

impl std::fmt::Debug for AccuWeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccuWeatherConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AccuWeatherConfig {
    /// Create a configuration with default endpoints for the given key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// A single value with its unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Numeric value
    #[serde(rename = "Value")]
    pub value: f64,
    /// Unit label (e.g. "F", "mi/h", "inHg")
    #[serde(rename = "Unit")]
    pub unit: String,
}

/// A measurement in both unit systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPair {
    /// Metric value
    #[serde(rename = "Metric")]
    pub metric: Measurement,
    /// Imperial value
    #[serde(rename = "Imperial")]
    pub imperial: Measurement,
}

/// Observed conditions for a location
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Local observation time
    pub observed_at: Option<DateTime<FixedOffset>>,
    /// Short description (e.g. "Mostly sunny")
    pub weather_text: String,
    /// Air temperature
    pub temperature: Option<UnitPair>,
    /// Wind speed
    pub wind_speed: Option<UnitPair>,
    /// Compass wind direction (e.g. "WSW")
    pub wind_direction: Option<String>,
    /// Barometric pressure
    pub pressure: Option<UnitPair>,
    /// Precipitation over the past 24 hours
    pub precipitation_24h: Option<UnitPair>,
    /// Link to the provider's page for this location
    pub link: Option<String>,
}

// ── AccuWeather response types ───────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CityHit {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "LocalizedName", default)]
    localized_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConditionsEntry {
    #[serde(rename = "LocalObservationDateTime", default)]
    local_observation_date_time: Option<String>,
    #[serde(rename = "WeatherText", default)]
    weather_text: String,
    #[serde(rename = "Temperature", default)]
    temperature: Option<UnitPair>,
    #[serde(rename = "Wind", default)]
    wind: Option<Wind>,
    #[serde(rename = "Pressure", default)]
    pressure: Option<UnitPair>,
    #[serde(rename = "PrecipitationSummary", default)]
    precipitation_summary: Option<PrecipitationSummary>,
    #[serde(rename = "Link", default)]
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Wind {
    #[serde(rename = "Direction", default)]
    direction: Option<WindDirection>,
    #[serde(rename = "Speed", default)]
    speed: Option<UnitPair>,
}

#[derive(Debug, Deserialize)]
struct WindDirection {
    #[serde(rename = "English", default)]
    english: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PrecipitationSummary {
    #[serde(rename = "Past24Hours", default)]
    past_24_hours: Option<UnitPair>,
}

impl From<ConditionsEntry> for Observation {
    fn from(entry: ConditionsEntry) -> Self {
        let observed_at = entry
            .local_observation_date_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok());
        let (wind_speed, wind_direction) = entry
            .wind
            .map_or((None, None), |w| (w.speed, w.direction.and_then(|d| d.english)));

        Self {
            observed_at,
            weather_text: entry.weather_text,
            temperature: entry.temperature,
            wind_speed,
            wind_direction,
            pressure: entry.pressure,
            precipitation_24h: entry.precipitation_summary.and_then(|p| p.past_24_hours),
            link: entry.link,
        }
    }
}

// ── Implementation ────────────────────────────────────────────────────

/// AccuWeather HTTP client
#[derive(Debug)]
pub struct AccuWeatherClient {
    client: Client,
    config: AccuWeatherConfig,
}

impl AccuWeatherClient {
    /// Create a new AccuWeather client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be initialized.
    pub fn new(config: AccuWeatherConfig) -> Result<Self, WeatherError> {
        if config.api_key.trim().is_empty() {
            return Err(WeatherError::Configuration(
                "AccuWeather API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Resolve a place name to the provider's location key
    ///
    /// Returns `Ok(None)` when the search has no hits.
    #[instrument(skip(self))]
    pub async fn search_city(&self, place: &str) -> Result<Option<String>, WeatherError> {
        let url = format!("{}/locations/v1/cities/search", self.config.base_url);
        debug!(%place, "Searching AccuWeather city");

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.config.api_key.as_str()), ("q", place)])
            .send()
            .await
            .map_err(|e| WeatherError::from_transport(&e))?;

        let hits: Vec<CityHit> = json_body(response).await?;
        let first = hits.into_iter().next();
        match &first {
            Some(hit) => debug!(
                %place,
                key = %hit.key,
                name = hit.localized_name.as_deref().unwrap_or_default(),
                "Resolved AccuWeather city"
            ),
            None => warn!(%place, "No AccuWeather city found"),
        }
        Ok(first.map(|hit| hit.key))
    }

    /// Fetch current conditions for a location key
    ///
    /// Returns `Ok(None)` when the provider has no observation for the key.
    #[instrument(skip(self))]
    pub async fn current_conditions(
        &self,
        location_key: &str,
    ) -> Result<Option<Observation>, WeatherError> {
        let url = format!(
            "{}/currentconditions/v1/{location_key}",
            self.config.base_url
        );
        debug!(%location_key, "Fetching AccuWeather current conditions");

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.config.api_key.as_str()), ("details", "true")])
            .send()
            .await
            .map_err(|e| WeatherError::from_transport(&e))?;

        let entries: Vec<ConditionsEntry> = json_body(response).await?;
        Ok(entries.into_iter().next().map(Observation::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> serde_json::Value {
        serde_json::json!({
            "LocalObservationDateTime": "2024-06-01T14:25:00-07:00",
            "WeatherText": "Mostly sunny",
            "Temperature": {
                "Metric": { "Value": 23.9, "Unit": "C" },
                "Imperial": { "Value": 75.0, "Unit": "F" }
            },
            "Wind": {
                "Direction": { "Degrees": 248, "English": "WSW" },
                "Speed": {
                    "Metric": { "Value": 13.0, "Unit": "km/h" },
                    "Imperial": { "Value": 8.1, "Unit": "mi/h" }
                }
            },
            "Pressure": {
                "Metric": { "Value": 1014.0, "Unit": "mb" },
                "Imperial": { "Value": 29.94, "Unit": "inHg" }
            },
            "PrecipitationSummary": {
                "Past24Hours": {
                    "Metric": { "Value": 0.0, "Unit": "mm" },
                    "Imperial": { "Value": 0.0, "Unit": "in" }
                }
            },
            "Link": "http://www.accuweather.com/en/us/los-angeles-ca/90012/current-weather/347625"
        })
    }

    #[test]
    fn test_observation_from_entry() {
        let entry: ConditionsEntry = serde_json::from_value(sample_entry()).unwrap();
        let obs = Observation::from(entry);

        assert_eq!(obs.weather_text, "Mostly sunny");
        assert_eq!(obs.wind_direction.as_deref(), Some("WSW"));
        let temp = obs.temperature.unwrap();
        assert!((temp.imperial.value - 75.0).abs() < f64::EPSILON);
        assert_eq!(temp.metric.unit, "C");
        assert!(obs.observed_at.is_some());
        assert!(obs.precipitation_24h.is_some());
        assert!(obs.link.unwrap().contains("347625"));
    }

    #[test]
    fn test_observation_tolerates_sparse_entry() {
        let entry: ConditionsEntry =
            serde_json::from_value(serde_json::json!({ "WeatherText": "Fog" })).unwrap();
        let obs = Observation::from(entry);
        assert_eq!(obs.weather_text, "Fog");
        assert!(obs.temperature.is_none());
        assert!(obs.wind_speed.is_none());
        assert!(obs.observed_at.is_none());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = AccuWeatherClient::new(AccuWeatherConfig::new("  "));
        assert!(matches!(result, Err(WeatherError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AccuWeatherConfig::new("super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_config_defaults() {
        let config = AccuWeatherConfig::new("key");
        assert_eq!(config.base_url, "https://dataservice.accuweather.com");
        assert_eq!(config.timeout_secs, 15);
    }
}
