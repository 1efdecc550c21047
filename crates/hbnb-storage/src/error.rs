//! Storage error types for hbnb-storage.
//!
//! [`StorageError`] separates the failure classes callers must tell apart:
//! invalid arguments, invariant violations (id collisions, dangling
//! references), and persistence failures (I/O, SQLite, corrupt documents).
//! Absence is never an error; lookups return `Ok(None)`.

use hbnb_core::{CoreError, EntityId, ObjectKey};
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing the backing document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The relational engine reported an error (including constraint failures).
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// Entity construction or validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A malformed argument such as an empty id.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The id is already live under another key.
    #[error("id collision: {id} is already live as {existing}")]
    IdCollision { id: EntityId, existing: ObjectKey },

    /// A reference names an entity that is not live.
    #[error("dangling reference: {entity} refers to missing {reference}")]
    DanglingReference {
        entity: ObjectKey,
        reference: ObjectKey,
    },

    /// The backing document exists but cannot be loaded.
    #[error("corrupt document {path}: {reason}")]
    CorruptDocument { path: String, reason: String },

    /// A stored row could not be turned back into an entity.
    #[error("reconstruction error: {reason}")]
    ReconstructionError { reason: String },

    /// Backend selection from the environment failed.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}
