//! Geocoding adapter - Implements GeocodingPort using Nominatim

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::{Coordinate, PlaceName};
use integration_weather::{NominatimClient, NominatimConfig};
use tracing::{debug, instrument};

use super::map_weather_error;

/// Adapter for place-name geocoding via Nominatim
#[derive(Debug)]
pub struct NominatimGeocodingAdapter {
    client: NominatimClient,
}

impl NominatimGeocodingAdapter {
    /// Create an adapter with the given client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: NominatimConfig) -> Result<Self, ApplicationError> {
        let client = NominatimClient::new(config).map_err(map_weather_error)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl GeocodingPort for NominatimGeocodingAdapter {
    #[instrument(skip(self), fields(place = %place))]
    async fn geocode(&self, place: &PlaceName) -> Result<Option<Coordinate>, ApplicationError> {
        let Some(hit) = self
            .client
            .search(place.as_str())
            .await
            .map_err(map_weather_error)?
        else {
            return Ok(None);
        };

        let coordinate = Coordinate::from_lat_lon(&hit.lat, &hit.lon)?;
        debug!(
            %coordinate,
            display_name = hit.display_name.as_deref().unwrap_or_default(),
            "Geocoded place"
        );
        Ok(Some(coordinate))
    }
}
