//! Pipeline state store port
//!
//! Coarse get/set access to the single persisted `PipelineState` document.
//! There is no locking: concurrent writers resolve as last-write-wins, which
//! the append-only cache maps make harmless.

use async_trait::async_trait;
use domain::PipelineState;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the durable key-value state handle
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StateStorePort: Send + Sync {
    /// Read the persisted state, `None` if nothing has been stored yet
    async fn get(&self) -> Result<Option<PipelineState>, ApplicationError>;

    /// Replace the persisted state
    async fn set(&self, state: &PipelineState) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn StateStorePort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn StateStorePort>();
    }

    #[tokio::test]
    async fn mock_get_returns_nothing_when_fresh() {
        let mut mock = MockStateStorePort::new();
        mock.expect_get().returning(|| Ok(None));
        assert!(mock.get().await.unwrap().is_none());
    }
}
