//! The [`ObjectStore`] trait defining the storage contract for entities.
//!
//! Both backends ([`FileStore`](crate::FileStore) and
//! [`SqliteStore`](crate::SqliteStore)) implement this trait, so callers hold
//! a `dyn ObjectStore` and never branch on which one is active.
//!
//! Lookups hand out references into the store's own registry (File) or
//! per-session identity map (SQLite). Repeated lookups of the same key
//! therefore see the same instance, and mutations made through
//! [`ObjectStore::get_mut`] are what the next [`ObjectStore::save`] persists.

use indexmap::IndexMap;

use hbnb_core::{Entity, EntityKind, ObjectKey};

use crate::error::StorageError;

/// The storage contract for HBnB entities.
///
/// The trait is synchronous; the server serializes access to one store
/// instance, so every call runs to completion before the next begins.
pub trait ObjectStore {
    /// Returns every live entity, optionally restricted to one kind.
    fn all(&mut self, kind: Option<EntityKind>)
        -> Result<IndexMap<ObjectKey, &Entity>, StorageError>;

    /// Looks up one entity by exact kind and id.
    ///
    /// An unknown id is `Ok(None)`; an empty id is an invalid argument.
    fn get(&mut self, kind: EntityKind, id: &str) -> Result<Option<&Entity>, StorageError>;

    /// Mutable form of [`ObjectStore::get`]. Changes become durable on the
    /// next [`ObjectStore::save`].
    fn get_mut(&mut self, kind: EntityKind, id: &str)
        -> Result<Option<&mut Entity>, StorageError>;

    /// Registers a freshly created entity as pending.
    ///
    /// The entity is visible to `get`/`all` immediately and durable after
    /// `save`. Rejects an id that is already live and references to
    /// entities that are not live.
    fn register(&mut self, entity: Entity) -> Result<ObjectKey, StorageError>;

    /// Persists all pending and mutated state.
    fn save(&mut self) -> Result<(), StorageError>;

    /// Removes an entity and everything that belongs to it.
    ///
    /// Returns the removed entity, or `None` if nothing was live under the
    /// key. The removal is visible at once and durable after `save`.
    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<Option<Entity>, StorageError>;

    /// Number of live entities, optionally restricted to one kind.
    fn count(&mut self, kind: Option<EntityKind>) -> Result<usize, StorageError> {
        Ok(self.all(kind)?.len())
    }

    /// Re-populates state from durable storage.
    fn reload(&mut self) -> Result<(), StorageError>;

    /// Ends the current session, discarding anything not yet saved where the
    /// backend supports it.
    fn close(&mut self) -> Result<(), StorageError>;
}

/// Rejects ids that cannot name any entity.
pub(crate) fn require_id(id: &str) -> Result<(), StorageError> {
    if id.trim().is_empty() {
        return Err(StorageError::InvalidArgument {
            reason: "entity id must not be empty".to_string(),
        });
    }
    Ok(())
}
