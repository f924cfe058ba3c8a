//! NWS adapter - Implements StationPort and ForecastPort using api.weather.gov

use application::error::ApplicationError;
use application::ports::{ForecastPort, StationPort};
use async_trait::async_trait;
use domain::{Coordinate, StationRef};
use integration_weather::{NwsClient, NwsConfig};
use tracing::{debug, instrument};

use super::map_weather_error;

/// Adapter for the National Weather Service
///
/// One client serves both the grid-station and the forecast stage.
#[derive(Debug, Clone)]
pub struct NwsAdapter {
    client: NwsClient,
}

impl NwsAdapter {
    /// Create an adapter with the given client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: NwsConfig) -> Result<Self, ApplicationError> {
        let client = NwsClient::new(config).map_err(map_weather_error)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StationPort for NwsAdapter {
    #[instrument(skip(self), fields(coordinate = %coordinate))]
    async fn station_for(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<StationRef>, ApplicationError> {
        let grid = self
            .client
            .point(coordinate.as_str())
            .await
            .map_err(map_weather_error)?;

        let station = grid.map(|g| StationRef::new(&g.grid_id, g.grid_x, g.grid_y));
        if let Some(station) = &station {
            debug!(%station, "Resolved grid station");
        }
        Ok(station)
    }
}

#[async_trait]
impl ForecastPort for NwsAdapter {
    #[instrument(skip(self), fields(station = %station))]
    async fn forecast_for(&self, station: &StationRef) -> Result<Option<String>, ApplicationError> {
        self.client
            .forecast(station.as_str())
            .await
            .map_err(map_weather_error)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn adapter(server: &MockServer) -> NwsAdapter {
        NwsAdapter::new(NwsConfig {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn station_from_encoded_coordinate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/points/34\.05(%2C|,)-118\.24$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "gridId": "LOX", "gridX": 154, "gridY": 44 }
            })))
            .mount(&server)
            .await;

        let coordinate = Coordinate::from_lat_lon("34.05", "-118.24").unwrap();
        let station = adapter(&server).station_for(&coordinate).await.unwrap();
        assert_eq!(station.map(|s| s.as_str().to_string()).as_deref(), Some("LOX/154,44"));
    }

    #[tokio::test]
    async fn incomplete_grid_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/points/44\.1(%2C|,)-103\.2$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "gridId": null, "gridX": 1, "gridY": 2 }
            })))
            .mount(&server)
            .await;

        let coordinate = Coordinate::from_lat_lon("44.1", "-103.2").unwrap();
        assert!(adapter(&server).station_for(&coordinate).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn forecast_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gridpoints/LOX/154,44/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "periods": [ { "detailedForecast": "Sunny." } ] }
            })))
            .mount(&server)
            .await;

        let text = adapter(&server)
            .forecast_for(&StationRef::new("LOX", 154, 44))
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("Sunny."));
    }

    #[tokio::test]
    async fn forecast_server_error_is_external() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gridpoints/LOX/154,44/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = adapter(&server)
            .forecast_for(&StationRef::new("LOX", 154, 44))
            .await;
        assert!(matches!(result, Err(ApplicationError::ExternalService(_))));
    }
}
