//! AccuWeather adapter - Implements ConditionsPort

use application::error::ApplicationError;
use application::ports::{ConditionsPort, CurrentConditions, Reading};
use async_trait::async_trait;
use domain::{PlaceName, ProviderCityId};
use integration_weather::{AccuWeatherClient, AccuWeatherConfig, Observation, UnitPair};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::map_weather_error;

/// Which half of AccuWeather's metric/imperial pairs to report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Celsius, km/h, mb, mm
    Metric,
    /// Fahrenheit, mi/h, inHg, in
    #[default]
    Imperial,
}

impl UnitSystem {
    fn pick(self, pair: UnitPair) -> Reading {
        let measurement = match self {
            Self::Metric => pair.metric,
            Self::Imperial => pair.imperial,
        };
        Reading {
            value: measurement.value,
            unit: measurement.unit,
        }
    }
}

/// Adapter for AccuWeather current conditions
#[derive(Debug)]
pub struct AccuWeatherAdapter {
    client: AccuWeatherClient,
    units: UnitSystem,
}

impl AccuWeatherAdapter {
    /// Create an adapter with the given client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client fails to initialize.
    pub fn new(config: AccuWeatherConfig, units: UnitSystem) -> Result<Self, ApplicationError> {
        let client = AccuWeatherClient::new(config).map_err(map_weather_error)?;
        Ok(Self { client, units })
    }

    fn map_observation(&self, obs: Observation) -> CurrentConditions {
        let units = self.units;
        CurrentConditions {
            summary: obs.weather_text,
            temperature: obs.temperature.map(|p| units.pick(p)),
            wind_speed: obs.wind_speed.map(|p| units.pick(p)),
            wind_direction: obs.wind_direction,
            pressure: obs.pressure.map(|p| units.pick(p)),
            precipitation_24h: obs.precipitation_24h.map(|p| units.pick(p)),
            link: obs.link,
            observed_at: obs.observed_at,
        }
    }
}

#[async_trait]
impl ConditionsPort for AccuWeatherAdapter {
    #[instrument(skip(self), fields(place = %place))]
    async fn city_id_for(
        &self,
        place: &PlaceName,
    ) -> Result<Option<ProviderCityId>, ApplicationError> {
        let key = self
            .client
            .search_city(place.as_str())
            .await
            .map_err(map_weather_error)?;
        Ok(key.map(ProviderCityId::new))
    }

    #[instrument(skip(self), fields(city = %city))]
    async fn current_conditions(
        &self,
        city: &ProviderCityId,
    ) -> Result<Option<CurrentConditions>, ApplicationError> {
        let observation = self
            .client
            .current_conditions(city.as_str())
            .await
            .map_err(map_weather_error)?;

        let conditions = observation.map(|obs| self.map_observation(obs));
        if let Some(c) = &conditions {
            debug!(summary = %c.summary, "Retrieved current conditions");
        }
        Ok(conditions)
    }
}
