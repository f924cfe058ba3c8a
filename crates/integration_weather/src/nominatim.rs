//! Nominatim geocoding client
//!
//! Converts free-form place names to coordinates using the
//! [Nominatim](https://nominatim.openstreetmap.org) search API (OpenStreetMap).
//!
//! Only administrative-area hits are considered so that "Springfield" resolves
//! to the town rather than a shop of that name. The best hit is the one with
//! the highest importance score.
//!
//! Nominatim's usage policy allows at most one request per second, so
//! consecutive searches are spaced by `min_interval_ms`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::WeatherError;
use crate::http::json_body;

/// Result type Nominatim uses for cities, counties and regions
const ADMINISTRATIVE: &str = "administrative";

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum spacing between two requests in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// User-Agent sent with every request (required by the usage policy)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_min_interval_ms() -> u64 {
    1100
}

fn default_user_agent() -> String {
    concat!(
        "weathervane/",
        env!("CARGO_PKG_VERSION"),
        " (https://github.com/twohreichel/weathervane)"
    )
    .to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            min_interval_ms: default_min_interval_ms(),
            user_agent: default_user_agent(),
        }
    }
}

/// Best administrative match for a search
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Latitude exactly as returned by Nominatim
    pub lat: String,
    /// Longitude exactly as returned by Nominatim
    pub lon: String,
    /// Human readable name of the match
    pub display_name: Option<String>,
    /// Nominatim importance score
    pub importance: Option<f64>,
}

/// Raw Nominatim search hit
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    importance: Option<f64>,
    #[serde(default)]
    display_name: Option<String>,
}

/// Nominatim search client with request spacing
#[derive(Debug)]
pub struct NominatimClient {
    client: Client,
    config: NominatimConfig,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    /// Create a new Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: NominatimConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WeatherError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config,
            last_request: Mutex::new(None),
        })
    }

    /// Wait until the usage-policy interval since the previous request has passed
    async fn pace(&self) {
        let interval = Duration::from_millis(self.config.min_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval.saturating_sub(elapsed);
                debug!(?wait, "Spacing geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Search for a place and return its best administrative match
    ///
    /// Returns `Ok(None)` when the search has no administrative hits.
    #[instrument(skip(self))]
    pub async fn search(&self, place: &str) -> Result<Option<GeocodedPlace>, WeatherError> {
        self.pace().await;

        let url = format!("{}/search", self.config.base_url);
        debug!(%place, "Fetching lat,lon");

        let response = self
            .client
            .get(&url)
            .query(&[("q", place), ("format", "json")])
            .send()
            .await
            .map_err(|e| WeatherError::from_transport(&e))?;

        let hits: Vec<SearchHit> = json_body(response).await?;
        let total = hits.len();
        let best = best_administrative(hits);

        match &best {
            Some(hit) => debug!(%place, lat = %hit.lat, lon = %hit.lon, "Geocoded place"),
            None => warn!(%place, total, "No administrative results"),
        }
        Ok(best)
    }
}

/// Keep administrative hits and pick the one with the highest importance
fn best_administrative(hits: Vec<SearchHit>) -> Option<GeocodedPlace> {
    let mut admin: Vec<SearchHit> = hits
        .into_iter()
        .filter(|hit| hit.kind.as_deref() == Some(ADMINISTRATIVE))
        .collect();

    // Stable sort: equal scores keep Nominatim's own ranking
    admin.sort_by(|a, b| {
        let a = a.importance.unwrap_or(f64::NEG_INFINITY);
        let b = b.importance.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    admin.into_iter().next().map(|hit| GeocodedPlace {
        lat: hit.lat,
        lon: hit.lon,
        display_name: hit.display_name,
        importance: hit.importance,
    })
}
