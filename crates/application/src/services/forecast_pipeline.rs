//! Forecast pipeline
//!
//! Resolves a place name to a forecast in three stages:
//!
//! 1. place name -> coordinate (geocoding, cached)
//! 2. coordinate -> forecast grid station (cached)
//! 3. station -> forecast text (always fetched fresh)
//!
//! When a conditions provider is configured, the place name is additionally
//! mapped to the provider's city id (cached) and current conditions are
//! attached to a successful forecast.
//!
//! The state is read once and written back at most once per run. Stage
//! failures are never cached, so a later run retries them.

use std::fmt;
use std::sync::Arc;

use domain::{Coordinate, PipelineState, PlaceName, ProviderCityId, StationRef};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::ports::{
    ConditionsPort, CurrentConditions, ForecastPort, GeocodingPort, StateStorePort, StationPort,
};
use crate::services::ResolutionCache;

/// Text reported when no forecast could be produced for a place
#[must_use]
pub fn fallback_message(place: &PlaceName) -> String {
    format!("Unable to find results for \"{place}\"!")
}

/// Outcome of a lookup, ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// The place that was looked up
    pub place: PlaceName,
    /// Forecast text, or the fallback message
    pub forecast: String,
    /// Whether `forecast` is a real forecast
    pub found: bool,
    /// Current conditions, when the enrichment stage produced them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<CurrentConditions>,
}

impl ForecastReport {
    /// A report carrying a forecast
    #[must_use]
    pub fn found(place: &PlaceName, forecast: String) -> Self {
        Self {
            place: place.clone(),
            forecast,
            found: true,
            conditions: None,
        }
    }

    /// A report carrying the fallback message
    #[must_use]
    pub fn not_found(place: &PlaceName) -> Self {
        Self {
            place: place.clone(),
            forecast: fallback_message(place),
            found: false,
            conditions: None,
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The report to deliver
    pub report: ForecastReport,
    /// State after the run (clean if the flush succeeded)
    pub state: PipelineState,
    /// Whether the state was written back
    pub flushed: bool,
}

/// Orchestrates the resolve-and-cache stages
pub struct ForecastPipeline {
    geocoder: Arc<dyn GeocodingPort>,
    stations: Arc<dyn StationPort>,
    forecasts: Arc<dyn ForecastPort>,
    conditions: Option<Arc<dyn ConditionsPort>>,
    cache: ResolutionCache,
}

impl fmt::Debug for ForecastPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForecastPipeline")
            .field("enrichment", &self.conditions.is_some())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ForecastPipeline {
    /// Create a pipeline without the conditions stage
    #[must_use]
    pub fn new(
        geocoder: Arc<dyn GeocodingPort>,
        stations: Arc<dyn StationPort>,
        forecasts: Arc<dyn ForecastPort>,
        store: Arc<dyn StateStorePort>,
    ) -> Self {
        Self {
            geocoder,
            stations,
            forecasts,
            conditions: None,
            cache: ResolutionCache::new(store),
        }
    }

    /// Enable the current-conditions stage
    #[must_use]
    pub fn with_conditions(mut self, conditions: Arc<dyn ConditionsPort>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Load the persisted state and run the pipeline for a place
    ///
    /// An unreadable store is treated as an empty one.
    #[instrument(skip(self), fields(place = %place))]
    pub async fn lookup(&self, place: &PlaceName) -> PipelineRun {
        let state = match self.cache.load().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Could not load pipeline state, starting empty");
                PipelineState::new()
            },
        };
        self.run(place, state).await
    }

    /// Run the pipeline for a place against an already loaded state
    #[instrument(skip(self, state), fields(place = %place))]
    pub async fn run(&self, place: &PlaceName, mut state: PipelineState) -> PipelineRun {
        let Some(coordinate) = self.resolve_coordinate(place, &mut state).await else {
            error!("Geocoding lookup failed");
            return PipelineRun {
                report: ForecastReport::not_found(place),
                state,
                flushed: false,
            };
        };

        let station = self.resolve_station(&coordinate, &mut state).await;

        let city = match (&self.conditions, &station) {
            (Some(conditions), Some(_)) => {
                self.resolve_city(conditions.as_ref(), place, &mut state)
                    .await
            },
            _ => None,
        };

        let flushed = match self.cache.flush(&mut state).await {
            Ok(flushed) => flushed,
            Err(e) => {
                error!(error = %e, "Failed to persist pipeline state");
                false
            },
        };

        let Some(station) = station else {
            error!(%coordinate, "NWS station lookup failed");
            return PipelineRun {
                report: ForecastReport::not_found(place),
                state,
                flushed,
            };
        };

        let mut report = match self.fetch_forecast(&station).await {
            Some(text) => ForecastReport::found(place, text),
            None => ForecastReport::not_found(place),
        };

        if report.found {
            if let (Some(conditions), Some(city)) = (&self.conditions, &city) {
                report.conditions = fetch_conditions(conditions.as_ref(), city).await;
            }
        }

        info!(found = report.found, flushed, "Forecast lookup finished");
        PipelineRun {
            report,
            state,
            flushed,
        }
    }

    async fn resolve_coordinate(
        &self,
        place: &PlaceName,
        state: &mut PipelineState,
    ) -> Option<Coordinate> {
        if let Some(cached) = state.coordinate_for(place) {
            debug!(coordinate = %cached, "Coordinate cache hit");
            return Some(cached.clone());
        }

        match self.geocoder.geocode(place).await {
            Ok(Some(coordinate)) => {
                state.record_coordinate(place.clone(), coordinate.clone());
                Some(coordinate)
            },
            Ok(None) => {
                warn!("Geocoder returned no usable match");
                None
            },
            Err(e) => {
                warn!(error = %e, "Geocoding request failed");
                None
            },
        }
    }

    async fn resolve_station(
        &self,
        coordinate: &Coordinate,
        state: &mut PipelineState,
    ) -> Option<StationRef> {
        if let Some(cached) = state.station_for(coordinate) {
            debug!(station = %cached, "Station cache hit");
            return Some(cached.clone());
        }

        match self.stations.station_for(coordinate).await {
            Ok(Some(station)) => {
                state.record_station(coordinate.clone(), station.clone());
                Some(station)
            },
            Ok(None) => {
                warn!(%coordinate, "No grid station for coordinate");
                None
            },
            Err(e) => {
                warn!(%coordinate, error = %e, "Station request failed");
                None
            },
        }
    }

    async fn resolve_city(
        &self,
        conditions: &dyn ConditionsPort,
        place: &PlaceName,
        state: &mut PipelineState,
    ) -> Option<ProviderCityId> {
        if let Some(cached) = state.city_for(place) {
            debug!(city = %cached, "City id cache hit");
            return Some(cached.clone());
        }

        match conditions.city_id_for(place).await {
            Ok(Some(city)) => {
                state.record_city(place.clone(), city.clone());
                Some(city)
            },
            Ok(None) => {
                warn!("Conditions provider has no city for place");
                None
            },
            Err(e) => {
                warn!(error = %e, "City id request failed");
                None
            },
        }
    }

    async fn fetch_forecast(&self, station: &StationRef) -> Option<String> {
        match self.forecasts.forecast_for(station).await {
            Ok(Some(text)) => Some(text),
            Ok(None) => {
                warn!(%station, "Forecast had no periods");
                None
            },
            Err(e) => {
                error!(%station, error = %e, "Forecast request failed");
                None
            },
        }
    }
}

async fn fetch_conditions(
    conditions: &dyn ConditionsPort,
    city: &ProviderCityId,
) -> Option<CurrentConditions> {
    match conditions.current_conditions(city).await {
        Ok(found) => found,
        Err(e) => {
            warn!(%city, error = %e, "Current conditions request failed");
            None
        },
    }
}
