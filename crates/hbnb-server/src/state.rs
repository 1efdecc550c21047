//! Application state with one shared object store.
//!
//! [`AppState`] wraps the store in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers. Each request takes the lock for its whole body through
//! [`AppState::session`], so its register/mutate/save sequence never
//! interleaves with another request's.

use std::sync::Arc;

use hbnb_storage::{ObjectStore, SqliteStore, StorageConfig, StorageError};

use crate::service::StoreSession;

/// The store type shared by all handlers.
pub type SharedStore = Arc<tokio::sync::Mutex<Box<dyn ObjectStore + Send>>>;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    /// Opens the configured backend.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        Ok(Self::from_store(config.open()?))
    }

    pub fn from_store(store: Box<dyn ObjectStore + Send>) -> Self {
        AppState {
            store: Arc::new(tokio::sync::Mutex::new(store)),
        }
    }

    /// Creates an `AppState` over an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_store(Box::new(SqliteStore::in_memory()?)))
    }

    /// Waits for exclusive use of the store. The session is closed when the
    /// returned guard drops.
    pub async fn session(&self) -> StoreSession {
        StoreSession::new(self.store.clone().lock_owned().await)
    }
}
