//! Persistence module
//!
//! Durable and in-memory homes for the pipeline state document.

mod in_memory_state_store;
mod redb_state_store;

pub use in_memory_state_store::InMemoryStateStore;
pub use redb_state_store::RedbStateStore;
