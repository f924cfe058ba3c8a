//! Integration tests for the weather clients using wiremock
//!
//! These tests verify each client's behavior against a mock HTTP server,
//! ensuring proper handling of various response scenarios.

use integration_weather::{
    AccuWeatherClient, AccuWeatherConfig, GridPoint, NominatimClient, NominatimConfig, NwsClient,
    NwsConfig, WeatherError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn create_nominatim(mock_server: &MockServer) -> NominatimClient {
    let config = NominatimConfig {
        base_url: mock_server.uri(),
        timeout_secs: 5,
        min_interval_ms: 0,
        ..Default::default()
    };
    #[allow(clippy::expect_used)]
    NominatimClient::new(config).expect("Failed to create client")
}

fn create_nws(mock_server: &MockServer) -> NwsClient {
    let config = NwsConfig {
        base_url: mock_server.uri(),
        timeout_secs: 5,
        ..Default::default()
    };
    #[allow(clippy::expect_used)]
    NwsClient::new(config).expect("Failed to create client")
}

fn create_accuweather(mock_server: &MockServer) -> AccuWeatherClient {
    let config = AccuWeatherConfig {
        base_url: mock_server.uri(),
        timeout_secs: 5,
        ..AccuWeatherConfig::new("test-key")
    };
    #[allow(clippy::expect_used)]
    AccuWeatherClient::new(config).expect("Failed to create client")
}

// ============================================================================
// Nominatim
// ============================================================================

#[tokio::test]
async fn test_search_returns_best_administrative_hit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Los Angeles"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "34.0", "lon": "-118.0", "type": "attraction", "importance": 0.95 },
            { "lat": "34.0536909", "lon": "-118.242766", "type": "administrative", "importance": 0.81 },
            { "lat": "33.9", "lon": "-118.1", "type": "administrative", "importance": 0.42 }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_nominatim(&mock_server);
    let place = client.search("Los Angeles").await.unwrap().unwrap();

    assert_eq!(place.lat, "34.0536909");
    assert_eq!(place.lon, "-118.242766");
}

#[tokio::test]
async fn test_search_without_administrative_hits_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "1.0", "lon": "1.0", "type": "house" }
        ])))
        .mount(&mock_server)
        .await;

    let client = create_nominatim(&mock_server);
    assert!(client.search("Nowhereville").await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_nominatim(&mock_server);
    let result = client.search("Boise").await;
    assert!(matches!(result, Err(WeatherError::ServiceUnavailable(_))));
}

#[tokio::test]
async fn test_search_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = create_nominatim(&mock_server);
    let result = client.search("Boise").await;
    assert!(matches!(result, Err(WeatherError::RateLimitExceeded)));
}

#[tokio::test]
async fn test_search_invalid_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = create_nominatim(&mock_server);
    let result = client.search("Boise").await;
    assert!(matches!(result, Err(WeatherError::ParseError(_))));
}

// ============================================================================
// NWS
// ============================================================================

#[tokio::test]
async fn test_point_returns_grid_cell() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/points/34.05,-118.24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": { "gridId": "LOX", "gridX": 154, "gridY": 44, "forecastOffice": "x" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_nws(&mock_server);
    let grid = client.point("34.05,-118.24").await.unwrap();

    assert_eq!(
        grid,
        Some(GridPoint {
            grid_id: "LOX".to_string(),
            grid_x: 154,
            grid_y: 44,
        })
    );
}

#[tokio::test]
async fn test_point_missing_field_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/points/0,0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": { "gridId": "LOX", "gridX": 154 }
        })))
        .mount(&mock_server)
        .await;

    let client = create_nws(&mock_server);
    assert!(client.point("0,0").await.unwrap().is_none());
}

#[tokio::test]
async fn test_point_outside_coverage_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/points/51.5,-0.12"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "title": "Data Unavailable For Requested Point"
        })))
        .mount(&mock_server)
        .await;

    let client = create_nws(&mock_server);
    let result = client.point("51.5,-0.12").await;
    assert!(matches!(result, Err(WeatherError::RequestFailed(_))));
}

#[tokio::test]
async fn test_forecast_returns_first_period() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gridpoints/LOX/154,44/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": {
                "periods": [
                    { "number": 1, "name": "This Afternoon", "detailedForecast": "Sunny, with a high near 78." },
                    { "number": 2, "name": "Tonight", "detailedForecast": "Mostly clear." }
                ]
            }
        })))
        .mount(&mock_server)
        .await;

    let client = create_nws(&mock_server);
    let text = client.forecast("LOX/154,44").await.unwrap();
    assert_eq!(text.as_deref(), Some("Sunny, with a high near 78."));
}

#[tokio::test]
async fn test_forecast_without_periods_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gridpoints/LOX/154,44/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": { "periods": [] }
        })))
        .mount(&mock_server)
        .await;

    let client = create_nws(&mock_server);
    assert!(client.forecast("LOX/154,44").await.unwrap().is_none());
}

#[tokio::test]
async fn test_forecast_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gridpoints/LOX/154,44/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_nws(&mock_server);
    let result = client.forecast("LOX/154,44").await;
    assert!(matches!(result, Err(WeatherError::ServiceUnavailable(_))));
}

// ============================================================================
// AccuWeather
// ============================================================================

#[tokio::test]
async fn test_search_city_returns_first_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .and(query_param("apikey", "test-key"))
        .and(query_param("q", "Los Angeles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "Key": "347625", "LocalizedName": "Los Angeles" },
            { "Key": "2172716", "LocalizedName": "Los Angeles" }
        ])))
        .mount(&mock_server)
        .await;

    let client = create_accuweather(&mock_server);
    let key = client.search_city("Los Angeles").await.unwrap();
    assert_eq!(key.as_deref(), Some("347625"));
}

#[tokio::test]
async fn test_search_city_no_hits() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = create_accuweather(&mock_server);
    assert!(client.search_city("Nowhereville").await.unwrap().is_none());
}

#[tokio::test]
async fn test_current_conditions_parses_first_entry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/currentconditions/v1/347625"))
        .and(query_param("details", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "LocalObservationDateTime": "2024-06-01T14:25:00-07:00",
            "WeatherText": "Sunny",
            "Temperature": {
                "Metric": { "Value": 25.0, "Unit": "C" },
                "Imperial": { "Value": 77.0, "Unit": "F" }
            },
            "Link": "http://www.accuweather.com/current-weather/347625"
        }])))
        .mount(&mock_server)
        .await;

    let client = create_accuweather(&mock_server);
    let obs = client.current_conditions("347625").await.unwrap().unwrap();

    assert_eq!(obs.weather_text, "Sunny");
    let temp = obs.temperature.unwrap();
    assert!((temp.imperial.value - 77.0).abs() < 0.01);
    assert!(obs.pressure.is_none());
}

#[tokio::test]
async fn test_current_conditions_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/currentconditions/v1/347625"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = create_accuweather(&mock_server);
    let result = client.current_conditions("347625").await;
    assert!(matches!(result, Err(WeatherError::RequestFailed(_))));
}
