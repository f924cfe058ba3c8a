//! National Weather Service client
//!
//! Two calls against `api.weather.gov`:
//! - `/points/{lat,lon}` resolves a coordinate to its forecast office grid cell
//! - `/gridpoints/{office}/{x},{y}/forecast` returns the period forecast for that cell
//!
//! The NWS API only covers the United States.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::WeatherError;
use crate::http::json_body;

/// NWS client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NwsConfig {
    /// API base URL (default: <https://api.weather.gov>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request (the API rejects anonymous clients)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.weather.gov".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!(
        "weathervane/",
        env!("CARGO_PKG_VERSION"),
        " (https://github.com/twohreichel/weathervane)"
    )
    .to_string()
}

impl Default for NwsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Forecast grid cell for a coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPoint {
    /// Forecast office id (e.g. "LOX")
    pub grid_id: String,
    /// Cell column
    pub grid_x: u32,
    /// Cell row
    pub grid_y: u32,
}

// ── NWS response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
struct PointProperties {
    #[serde(rename = "gridId", default)]
    grid_id: Option<String>,
    #[serde(rename = "gridX", default)]
    grid_x: Option<u32>,
    #[serde(rename = "gridY", default)]
    grid_y: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    properties: Option<ForecastProperties>,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Deserialize)]
struct ForecastPeriod {
    #[serde(rename = "detailedForecast", default)]
    detailed_forecast: Option<String>,
}

// ── Implementation ────────────────────────────────────────────────────

/// NWS API client
#[derive(Debug, Clone)]
pub struct NwsClient {
    client: Client,
    config: NwsConfig,
}

impl NwsClient {
    /// Create a new NWS client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: NwsConfig) -> Result<Self, WeatherError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/geo+json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| WeatherError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Resolve an encoded `lat,lon` path segment to its grid cell
    ///
    /// Returns `Ok(None)` when the office id or either index is missing.
    #[instrument(skip(self))]
    pub async fn point(&self, coordinate: &str) -> Result<Option<GridPoint>, WeatherError> {
        let url = format!("{}/points/{coordinate}", self.config.base_url);
        debug!(url = %url, "Fetching NWS grid point");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::from_transport(&e))?;

        let body: PointResponse = json_body(response).await?;
        let PointProperties {
            grid_id,
            grid_x,
            grid_y,
        } = body.properties;

        Ok(match (grid_id, grid_x, grid_y) {
            (Some(grid_id), Some(grid_x), Some(grid_y)) if !grid_id.is_empty() => Some(GridPoint {
                grid_id,
                grid_x,
                grid_y,
            }),
            _ => None,
        })
    }

    /// Fetch the detailed text of the first forecast period for a grid cell
    ///
    /// `station` is the `"<office>/<x>,<y>"` form. Returns `Ok(None)` when the
    /// response carries no periods or the first period has no text.
    #[instrument(skip(self))]
    pub async fn forecast(&self, station: &str) -> Result<Option<String>, WeatherError> {
        let url = format!("{}/gridpoints/{station}/forecast", self.config.base_url);
        debug!(url = %url, "Fetching NWS forecast");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::from_transport(&e))?;

        let body: ForecastResponse = json_body(response).await?;
        Ok(body
            .properties
            .and_then(|p| p.periods.into_iter().next())
            .and_then(|today| today.detailed_forecast)
            .filter(|text| !text.trim().is_empty()))
    }
}
