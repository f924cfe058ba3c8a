//! Current-conditions port
//!
//! Optional secondary provider. A place name is mapped to the provider's own
//! city id (cached, append-only), and the observation itself is always
//! fetched fresh.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use domain::{PlaceName, ProviderCityId};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A value with its display unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Numeric value
    pub value: f64,
    /// Unit label
    pub unit: String,
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unit.len() == 1 {
            // Temperature units read better attached: 72°F
            write!(f, "{}°{}", self.value, self.unit)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

/// Observed conditions at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Short description (e.g. "Mostly sunny")
    pub summary: String,
    /// Air temperature
    pub temperature: Option<Reading>,
    /// Wind speed
    pub wind_speed: Option<Reading>,
    /// Compass wind direction
    pub wind_direction: Option<String>,
    /// Barometric pressure
    pub pressure: Option<Reading>,
    /// Precipitation over the past 24 hours
    pub precipitation_24h: Option<Reading>,
    /// Provider link for more detail
    pub link: Option<String>,
    /// When the observation was taken (provider local time)
    pub observed_at: Option<DateTime<FixedOffset>>,
}

/// Port for the current-conditions provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConditionsPort: Send + Sync {
    /// Resolve a place name to the provider's city id
    async fn city_id_for(
        &self,
        place: &PlaceName,
    ) -> Result<Option<ProviderCityId>, ApplicationError>;

    /// Fetch the latest observation for a city id
    async fn current_conditions(
        &self,
        city: &ProviderCityId,
    ) -> Result<Option<CurrentConditions>, ApplicationError>;
}
