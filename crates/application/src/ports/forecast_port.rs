//! Forecast text port

use async_trait::async_trait;
use domain::StationRef;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for fetching the current forecast of a grid station
///
/// Forecasts expire, so results of this port are never cached.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Fetch the human-readable forecast for the current period
    ///
    /// `Ok(None)` means the provider returned no forecast periods.
    async fn forecast_for(&self, station: &StationRef) -> Result<Option<String>, ApplicationError>;
}
