//! Forecast grid station lookup port

use async_trait::async_trait;
use domain::{Coordinate, StationRef};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for resolving a coordinate to its forecast grid station
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StationPort: Send + Sync {
    /// Resolve a coordinate to a station reference
    ///
    /// `Ok(None)` means the provider returned no complete grid identifier.
    async fn station_for(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<StationRef>, ApplicationError>;
}
