//! Redb-backed state store
//!
//! Keeps the whole [`PipelineState`] as one JSON document in a single-row
//! table. Concurrent runs resolve as last-write-wins.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use application::{error::ApplicationError, ports::StateStorePort};
use async_trait::async_trait;
use domain::PipelineState;
use redb::{Database, DatabaseError, ReadableDatabase, StorageError, TableDefinition};
use tracing::{debug, instrument, warn};

/// Table holding the state document
const STATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("pipeline_state");

/// Row key of the state document
const STATE_KEY: &str = "state";

/// Persistent state store on an embedded redb file
///
/// # Auto-Recovery
///
/// If the database file is corrupted or in an incompatible format, it is
/// deleted and recreated empty. Any other open failure, such as the file
/// being held by another process, is returned and the file is left alone.
pub struct RedbStateStore {
    db: Arc<Database>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for RedbStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStateStore")
            .field("db", &"<Database>")
            .field("path", &self.path)
            .finish()
    }
}

fn store_error(context: &str, e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::StateStore(format!("{context}: {e}"))
}

/// Whether an open failure means the file content itself is unusable
fn is_unreadable_file(err: &DatabaseError) -> bool {
    match err {
        DatabaseError::UpgradeRequired(_) => true,
        DatabaseError::Storage(StorageError::Corrupted(_)) => true,
        // A bad header surfaces as invalid data rather than a failed read
        DatabaseError::Storage(StorageError::Io(e)) => e.kind() == io::ErrorKind::InvalidData,
        _ => false,
    }
}

impl RedbStateStore {
    /// Open (or create) a state store at the specified path
    ///
    /// # Errors
    ///
    /// Returns an error if the file is already open elsewhere, cannot be
    /// read, or cannot be opened after recreation.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ApplicationError> {
        let path_buf = path.as_ref().to_path_buf();

        if let Some(parent) = path_buf.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| store_error("Failed to create state directory", e))?;
        }

        let db = match Database::create(&path_buf) {
            Ok(db) => db,
            Err(e) if !is_unreadable_file(&e) => {
                return Err(store_error("Failed to open state database", e));
            },
            Err(e) => {
                warn!(
                    path = %path_buf.display(),
                    error = %e,
                    "State database corrupted or incompatible, recreating"
                );
                if path_buf.exists() {
                    fs::remove_file(&path_buf)
                        .map_err(|e| store_error("Failed to remove corrupted database", e))?;
                }
                Database::create(&path_buf)
                    .map_err(|e| store_error("Failed to create state database", e))?
            },
        };

        Self::ensure_table(&db)?;
        Ok(Self {
            db: Arc::new(db),
            path: Some(path_buf),
        })
    }

    /// Create an in-memory store (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, ApplicationError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| store_error("Failed to create in-memory database", e))?;

        Self::ensure_table(&db)?;
        Ok(Self {
            db: Arc::new(db),
            path: None,
        })
    }

    /// Path of the database file, if file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn ensure_table(db: &Database) -> Result<(), ApplicationError> {
        let write_txn = db
            .begin_write()
            .map_err(|e| store_error("Failed to begin write transaction", e))?;
        {
            // Opening the table creates it if it doesn't exist
            let _ = write_txn
                .open_table(STATE_TABLE)
                .map_err(|e| store_error("Failed to open state table", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| store_error("Failed to commit transaction", e))
    }
}

#[async_trait]
impl StateStorePort for RedbStateStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self) -> Result<Option<PipelineState>, ApplicationError> {
        let db = self.db.clone();

        // Redb operations are blocking, wrap in spawn_blocking
        let bytes = tokio::task::spawn_blocking(move || {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(STATE_TABLE)?;
            Ok::<_, redb::Error>(table.get(STATE_KEY)?.map(|v| v.value().to_vec()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| store_error("Redb get error", e))?;

        let Some(bytes) = bytes else {
            debug!("No persisted state");
            return Ok(None);
        };

        let state: PipelineState =
            serde_json::from_slice(&bytes).map_err(|e| store_error("State decode error", e))?;
        Ok(Some(state))
    }

    #[instrument(skip(self, state), level = "debug")]
    async fn set(&self, state: &PipelineState) -> Result<(), ApplicationError> {
        let bytes = serde_json::to_vec(state).map_err(|e| store_error("State encode error", e))?;
        let size = bytes.len();
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(STATE_TABLE)?;
                table.insert(STATE_KEY, bytes.as_slice())?;
            }
            write_txn.commit()?;
            Ok::<_, redb::Error>(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| store_error("Redb insert error", e))?;

        debug!(bytes = size, "Persisted pipeline state");
        Ok(())
    }
}
