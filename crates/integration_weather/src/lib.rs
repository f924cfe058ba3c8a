//! Weather lookup integrations
//!
//! HTTP clients for the three upstream services of the resolution chain:
//!
//! - [`NominatimClient`]: place name to coordinate via
//!   [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org)
//! - [`NwsClient`]: coordinate to forecast grid cell, and grid cell to
//!   forecast text via the [National Weather Service API](https://api.weather.gov)
//! - [`AccuWeatherClient`]: place name to city key, and city key to current
//!   conditions via the [AccuWeather API](https://developer.accuweather.com)
//!
//! Every client makes exactly one attempt per call. "Nothing usable" is
//! reported as `Ok(None)`; transport and HTTP failures as [`WeatherError`].

mod accuweather;
mod error;
mod http;
mod nominatim;
mod nws;

pub use accuweather::{AccuWeatherClient, AccuWeatherConfig, Measurement, Observation, UnitPair};
pub use error::WeatherError;
pub use nominatim::{GeocodedPlace, NominatimClient, NominatimConfig};
pub use nws::{GridPoint, NwsClient, NwsConfig};
