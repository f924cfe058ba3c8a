//! Geocoding port
//!
//! Resolves a free-text place name to a coordinate. Upstream geocoders are
//! rate-limited, so callers consult the resolution cache before using this.

use async_trait::async_trait;
use domain::{Coordinate, PlaceName};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for place-name geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a place name to a coordinate
    ///
    /// `Ok(None)` means the service answered but had no usable match.
    async fn geocode(&self, place: &PlaceName) -> Result<Option<Coordinate>, ApplicationError>;
}
