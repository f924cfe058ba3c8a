//! Persisted resolution-chain state
//!
//! The aggregate that is read once at the start of a lookup and written back
//! at most once. All three maps are append-only: once a key has a value it is
//! never replaced. Failed lookups are never stored, so they are retried on the
//! next run.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::value_objects::{Coordinate, PlaceName, ProviderCityId, StationRef};

/// Cached results of the geocode, station and provider-city stages
///
/// Field names match the persisted JSON shape (`luCache`, `staCache`, `awCache`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    /// Place name -> geocoded coordinate
    #[serde(rename = "luCache", default, deserialize_with = "non_null_entries")]
    lu_cache: BTreeMap<PlaceName, Coordinate>,

    /// Coordinate -> forecast grid station
    #[serde(rename = "staCache", default, deserialize_with = "non_null_entries")]
    sta_cache: BTreeMap<Coordinate, StationRef>,

    /// Place name -> current-conditions provider city id
    #[serde(
        rename = "awCache",
        default,
        deserialize_with = "non_null_entries",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    aw_cache: BTreeMap<PlaceName, ProviderCityId>,

    /// Pending changes that need a write-back; never persisted
    #[serde(skip)]
    dirty: bool,
}

impl PipelineState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached coordinate for a place name
    pub fn coordinate_for(&self, place: &PlaceName) -> Option<&Coordinate> {
        self.lu_cache.get(place)
    }

    /// Cached station for a coordinate
    pub fn station_for(&self, coordinate: &Coordinate) -> Option<&StationRef> {
        self.sta_cache.get(coordinate)
    }

    /// Cached provider city id for a place name
    pub fn city_for(&self, place: &PlaceName) -> Option<&ProviderCityId> {
        self.aw_cache.get(place)
    }

    /// Record a geocoded coordinate
    ///
    /// Returns `true` if the entry was added. An existing entry is left untouched.
    pub fn record_coordinate(&mut self, place: PlaceName, coordinate: Coordinate) -> bool {
        if self.lu_cache.contains_key(&place) {
            return false;
        }
        self.lu_cache.insert(place, coordinate);
        self.dirty = true;
        true
    }

    /// Record the station for a coordinate
    ///
    /// The coordinate must already be a value of the place-name map; otherwise
    /// nothing is recorded. Returns `true` if the entry was added.
    pub fn record_station(&mut self, coordinate: Coordinate, station: StationRef) -> bool {
        if self.sta_cache.contains_key(&coordinate)
            || !self.lu_cache.values().any(|c| *c == coordinate)
        {
            return false;
        }
        self.sta_cache.insert(coordinate, station);
        self.dirty = true;
        true
    }

    /// Record the provider city id for a place name
    ///
    /// Returns `true` if the entry was added.
    pub fn record_city(&mut self, place: PlaceName, city: ProviderCityId) -> bool {
        if self.aw_cache.contains_key(&place) {
            return false;
        }
        self.aw_cache.insert(place, city);
        self.dirty = true;
        true
    }

    /// Whether the state has changes that have not been written back
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the pending-changes marker after a successful write
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Number of cached coordinates
    pub fn coordinate_count(&self) -> usize {
        self.lu_cache.len()
    }

    /// Number of cached stations
    pub fn station_count(&self) -> usize {
        self.sta_cache.len()
    }

    /// Number of cached provider city ids
    pub fn city_count(&self) -> usize {
        self.aw_cache.len()
    }
}

/// Deserialize a map, dropping `null` values and treating a `null` map as empty
fn non_null_entries<'de, D, K, V>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    let raw: Option<BTreeMap<K, Option<V>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect())
}
