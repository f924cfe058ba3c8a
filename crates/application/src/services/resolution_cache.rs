//! Resolution cache
//!
//! Loads the persisted [`PipelineState`] once per run and writes it back at
//! most once, only when a stage recorded something new. Lookups and inserts
//! go through the state itself, which enforces the append-only rules.

use std::fmt;
use std::sync::Arc;

use domain::PipelineState;
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::StateStorePort;

/// Load/flush wrapper around the state store
#[derive(Clone)]
pub struct ResolutionCache {
    store: Arc<dyn StateStorePort>,
}

impl fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionCache").finish_non_exhaustive()
    }
}

impl ResolutionCache {
    /// Create a cache backed by the given store
    #[must_use]
    pub fn new(store: Arc<dyn StateStorePort>) -> Self {
        Self { store }
    }

    /// Read the persisted state, or an empty one if nothing has been stored
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<PipelineState, ApplicationError> {
        let state = self.store.get().await?.unwrap_or_default();
        debug!(
            coordinates = state.coordinate_count(),
            stations = state.station_count(),
            cities = state.city_count(),
            "Loaded pipeline state"
        );
        Ok(state)
    }

    /// Write the state back if it has unsaved changes
    ///
    /// Returns `true` when a write happened. The dirty marker is cleared only
    /// after the store accepted the write.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write; the state stays dirty.
    #[instrument(skip(self, state), fields(dirty = state.is_dirty()))]
    pub async fn flush(&self, state: &mut PipelineState) -> Result<bool, ApplicationError> {
        if !state.is_dirty() {
            return Ok(false);
        }

        self.store.set(state).await?;
        state.clear_dirty();
        debug!("Flushed pipeline state");
        Ok(true)
    }
}
