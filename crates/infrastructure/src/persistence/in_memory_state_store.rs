//! In-memory state store
//!
//! Used by the `memory` backend and in tests. Counts writes so callers can
//! check how often a run flushed.

use std::sync::atomic::{AtomicU64, Ordering};

use application::{error::ApplicationError, ports::StateStorePort};
use async_trait::async_trait;
use domain::PipelineState;
use parking_lot::RwLock;

/// Process-local state store
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    state: RwLock<Option<PipelineState>>,
    writes: AtomicU64,
}

impl InMemoryStateStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a state
    #[must_use]
    pub fn with_state(state: PipelineState) -> Self {
        Self {
            state: RwLock::new(Some(state)),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of `set` calls so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StateStorePort for InMemoryStateStore {
    async fn get(&self) -> Result<Option<PipelineState>, ApplicationError> {
        Ok(self.state.read().clone())
    }

    async fn set(&self, state: &PipelineState) -> Result<(), ApplicationError> {
        let mut stored = state.clone();
        stored.clear_dirty();
        *self.state.write() = Some(stored);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
