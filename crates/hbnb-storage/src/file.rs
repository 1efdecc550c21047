//! JSON-document implementation of [`ObjectStore`].
//!
//! [`FileStore`] keeps every live entity in an in-memory registry and, on
//! each save, rewrites one JSON document mapping `"<Kind>.<id>"` to the
//! entity's fields. The write goes to a temporary file in the same directory
//! which is fsynced and renamed over the target, so a reader never observes
//! a truncated document.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use hbnb_core::{CoreError, Entity, EntityData, EntityId, EntityKind, ObjectKey};

use crate::error::StorageError;
use crate::traits::{require_id, ObjectStore};

/// File-backed implementation of [`ObjectStore`].
///
/// The registry is the canonical copy of all entities; the document on disk
/// is its snapshot as of the last successful save. A failed save puts the
/// registry back to that snapshot.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    objects: IndexMap<ObjectKey, Entity>,
    durable: IndexMap<ObjectKey, Entity>,
}

impl FileStore {
    /// Creates an empty store bound to `path`. Nothing is read until
    /// [`ObjectStore::reload`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            objects: IndexMap::new(),
            durable: IndexMap::new(),
        }
    }

    /// Creates a store bound to `path` and loads the existing document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let mut store = FileStore::new(path);
        store.reload()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: impl Into<String>) -> StorageError {
        StorageError::CorruptDocument {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Finds the key an id is live under, whatever its kind.
    fn live_key(&self, id: &EntityId) -> Option<ObjectKey> {
        EntityKind::ALL
            .into_iter()
            .map(|kind| ObjectKey::new(kind, id.clone()))
            .find(|key| self.objects.contains_key(key))
    }

    /// Reads the document. A missing or blank file is an empty registry.
    fn read_document(&self) -> Result<IndexMap<ObjectKey, Entity>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(err) => return Err(err.into()),
        };
        if text.trim().is_empty() {
            return Ok(IndexMap::new());
        }

        let raw: IndexMap<String, Entity> =
            serde_json::from_str(&text).map_err(|err| self.corrupt(err.to_string()))?;
        let mut objects = IndexMap::with_capacity(raw.len());
        for (raw_key, entity) in raw {
            let key: ObjectKey = raw_key
                .parse()
                .map_err(|err: CoreError| self.corrupt(err.to_string()))?;
            if key != entity.key() {
                return Err(self.corrupt(format!(
                    "entry {raw_key} holds {}",
                    entity.key()
                )));
            }
            objects.insert(key, entity);
        }
        Ok(objects)
    }

    /// Writes the whole registry to a temp file, then renames it into place.
    fn write_document(&self) -> Result<(), StorageError> {
        let document: IndexMap<String, &Entity> = self
            .objects
            .iter()
            .map(|(key, entity)| (key.to_string(), entity))
            .collect();

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &document)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| StorageError::Io(err.error))?;
        Ok(())
    }

    /// Keys of every entity that transitively belongs to `root`.
    fn dependents_of(&self, root: &ObjectKey) -> Vec<ObjectKey> {
        let mut seen: HashSet<ObjectKey> = HashSet::from([root.clone()]);
        let mut queue = VecDeque::from([root.clone()]);
        let mut dependents = Vec::new();
        while let Some(parent) = queue.pop_front() {
            for (key, entity) in &self.objects {
                if !seen.contains(key) && entity.parents().contains(&parent) {
                    seen.insert(key.clone());
                    queue.push_back(key.clone());
                    dependents.push(key.clone());
                }
            }
        }
        dependents
    }
}

impl ObjectStore for FileStore {
    fn all(
        &mut self,
        kind: Option<EntityKind>,
    ) -> Result<IndexMap<ObjectKey, &Entity>, StorageError> {
        Ok(self
            .objects
            .iter()
            .filter(|(key, _)| kind.map_or(true, |k| key.kind == k))
            .map(|(key, entity)| (key.clone(), entity))
            .collect())
    }

    fn get(&mut self, kind: EntityKind, id: &str) -> Result<Option<&Entity>, StorageError> {
        require_id(id)?;
        Ok(self.objects.get(&ObjectKey::new(kind, id)))
    }

    fn get_mut(
        &mut self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<&mut Entity>, StorageError> {
        require_id(id)?;
        Ok(self.objects.get_mut(&ObjectKey::new(kind, id)))
    }

    fn register(&mut self, entity: Entity) -> Result<ObjectKey, StorageError> {
        if let Some(existing) = self.live_key(&entity.id) {
            return Err(StorageError::IdCollision {
                id: entity.id.clone(),
                existing,
            });
        }
        for reference in entity.references() {
            if !self.objects.contains_key(&reference) {
                return Err(StorageError::DanglingReference {
                    entity: entity.key(),
                    reference,
                });
            }
        }

        let key = entity.key();
        self.objects.insert(key.clone(), entity);
        Ok(key)
    }

    fn save(&mut self) -> Result<(), StorageError> {
        if let Err(err) = self.write_document() {
            warn!(path = %self.path.display(), %err, "save failed, discarding unsaved changes");
            self.objects = self.durable.clone();
            return Err(err);
        }
        self.durable = self.objects.clone();
        debug!(path = %self.path.display(), objects = self.objects.len(), "document saved");
        Ok(())
    }

    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<Option<Entity>, StorageError> {
        require_id(id)?;
        let key = ObjectKey::new(kind, id);
        if !self.objects.contains_key(&key) {
            if let Some(existing) = self.live_key(&key.id) {
                return Err(StorageError::IdCollision {
                    id: key.id,
                    existing,
                });
            }
            return Ok(None);
        }

        let dependents = self.dependents_of(&key);
        for dependent in &dependents {
            self.objects.shift_remove(dependent);
        }
        let removed = self.objects.shift_remove(&key);

        if kind == EntityKind::Amenity {
            for entity in self.objects.values_mut() {
                if let EntityData::Place(place) = &mut entity.data {
                    place.amenity_ids.retain(|amenity| amenity != &key.id);
                }
            }
        }
        if !dependents.is_empty() {
            debug!(%key, cascaded = dependents.len(), "cascading delete");
        }
        Ok(removed)
    }

    fn reload(&mut self) -> Result<(), StorageError> {
        self.objects = self.read_document()?;
        self.durable = self.objects.clone();
        debug!(path = %self.path.display(), objects = self.objects.len(), "document loaded");
        Ok(())
    }

    fn close(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}
