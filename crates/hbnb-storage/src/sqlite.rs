//! SQLite implementation of [`ObjectStore`].
//!
//! [`SqliteStore`] keeps one table per kind plus the `place_amenity` link
//! table. Work happens inside a session: the first write opens a
//! transaction, loaded entities are cached in an identity map so repeated
//! lookups see the same instance, and [`ObjectStore::save`] flushes mutated
//! entities and commits. [`ObjectStore::close`] rolls back whatever was not
//! saved and empties the identity map.

use std::collections::HashMap;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::debug;

use hbnb_core::{Entity, EntityData, EntityId, EntityKind, ObjectKey};

use crate::convert::{entity_from_row, insert_params, row_values, update_params};
use crate::error::StorageError;
use crate::schema::{self, PLACE_AMENITY};
use crate::traits::{require_id, ObjectStore};

/// Per-session state: the identity map and the keys mutated through it.
#[derive(Debug, Default)]
struct Session {
    identity: IndexMap<ObjectKey, Entity>,
    dirty: IndexSet<ObjectKey>,
}

/// SQLite-backed implementation of [`ObjectStore`].
pub struct SqliteStore {
    conn: Connection,
    session: Session,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and applies migrations.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = schema::open_database(path.as_ref())?;
        Ok(SqliteStore {
            conn,
            session: Session::default(),
        })
    }

    /// Opens a private in-memory database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = schema::open_in_memory()?;
        Ok(SqliteStore {
            conn,
            session: Session::default(),
        })
    }

    /// Loads `key` into the identity map if its row exists.
    fn fetch(&mut self, key: &ObjectKey) -> Result<bool, StorageError> {
        if self.session.identity.contains_key(key) {
            return Ok(true);
        }
        match load_one(&self.conn, key)? {
            Some(entity) => {
                self.session.identity.insert(key.clone(), entity);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops cached entities whose rows were removed by a cascade, and
    /// cached amenity links whose amenity is gone.
    fn prune_session(&mut self) -> Result<usize, StorageError> {
        let mut gone = Vec::new();
        for key in self.session.identity.keys() {
            if !row_exists(&self.conn, key)? {
                gone.push(key.clone());
            }
        }
        for key in &gone {
            self.session.identity.shift_remove(key);
            self.session.dirty.shift_remove(key);
        }

        for entity in self.session.identity.values_mut() {
            if let EntityData::Place(place) = &mut entity.data {
                let mut kept = Vec::with_capacity(place.amenity_ids.len());
                for amenity in place.amenity_ids.drain(..) {
                    let key = ObjectKey::new(EntityKind::Amenity, amenity);
                    if row_exists(&self.conn, &key)? {
                        kept.push(key.id);
                    }
                }
                place.amenity_ids = kept;
            }
        }
        Ok(gone.len())
    }
}

impl ObjectStore for SqliteStore {
    fn all(
        &mut self,
        kind: Option<EntityKind>,
    ) -> Result<IndexMap<ObjectKey, &Entity>, StorageError> {
        let kinds = match kind {
            Some(kind) => vec![kind],
            None => EntityKind::ALL.to_vec(),
        };
        let mut keys = Vec::new();
        for kind in kinds {
            for entity in load_kind(&self.conn, kind)? {
                let key = entity.key();
                self.session.identity.entry(key.clone()).or_insert(entity);
                keys.push(key);
            }
        }

        let identity = &self.session.identity;
        Ok(keys
            .into_iter()
            .filter_map(|key| identity.get(&key).map(|entity| (key, entity)))
            .collect())
    }

    fn get(&mut self, kind: EntityKind, id: &str) -> Result<Option<&Entity>, StorageError> {
        require_id(id)?;
        let key = ObjectKey::new(kind, id);
        self.fetch(&key)?;
        Ok(self.session.identity.get(&key))
    }

    fn get_mut(
        &mut self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<&mut Entity>, StorageError> {
        require_id(id)?;
        let key = ObjectKey::new(kind, id);
        if !self.fetch(&key)? {
            return Ok(None);
        }
        self.session.dirty.insert(key.clone());
        Ok(self.session.identity.get_mut(&key))
    }

    fn register(&mut self, entity: Entity) -> Result<ObjectKey, StorageError> {
        if let Some(existing) = live_key(&self.conn, &self.session.identity, &entity.id)? {
            return Err(StorageError::IdCollision {
                id: entity.id.clone(),
                existing,
            });
        }
        for reference in entity.references() {
            if !self.session.identity.contains_key(&reference) && !row_exists(&self.conn, &reference)? {
                return Err(StorageError::DanglingReference {
                    entity: entity.key(),
                    reference,
                });
            }
        }

        begin(&self.conn)?;
        insert_entity(&self.conn, &entity)?;
        let key = entity.key();
        self.session.identity.insert(key.clone(), entity);
        Ok(key)
    }

    fn save(&mut self) -> Result<(), StorageError> {
        if !self.session.dirty.is_empty() {
            begin(&self.conn)?;
        }
        for key in &self.session.dirty {
            if let Some(entity) = self.session.identity.get(key) {
                update_entity(&self.conn, entity)?;
            }
        }
        let updated = self.session.dirty.len();
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        self.session.dirty.clear();
        debug!(updated, "session committed");
        Ok(())
    }

    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<Option<Entity>, StorageError> {
        require_id(id)?;
        let key = ObjectKey::new(kind, id);
        if !self.fetch(&key)? {
            if let Some(existing) = live_key(&self.conn, &self.session.identity, &key.id)? {
                return Err(StorageError::IdCollision {
                    id: key.id,
                    existing,
                });
            }
            return Ok(None);
        }

        begin(&self.conn)?;
        self.conn.execute(
            &format!("DELETE FROM \"{}\" WHERE \"id\" = ?1", schema::table(kind)),
            params![id],
        )?;
        self.session.dirty.shift_remove(&key);
        let removed = self.session.identity.shift_remove(&key);
        let cascaded = self.prune_session()?;
        if cascaded > 0 {
            debug!(%key, cascaded, "cascading delete");
        }
        Ok(removed)
    }

    fn reload(&mut self) -> Result<(), StorageError> {
        self.close()?;
        schema::migrate(&mut self.conn)
    }

    fn close(&mut self) -> Result<(), StorageError> {
        self.session = Session::default();
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }
}

/// Opens a transaction unless one is already open.
fn begin(conn: &Connection) -> Result<(), StorageError> {
    if conn.is_autocommit() {
        conn.execute_batch("BEGIN")?;
    }
    Ok(())
}

fn row_exists(conn: &Connection, key: &ObjectKey) -> Result<bool, StorageError> {
    let exists = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM \"{}\" WHERE \"id\" = ?1)",
            schema::table(key.kind)
        ),
        params![key.id.as_str()],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Finds the key an id is live under, whatever its kind.
fn live_key(
    conn: &Connection,
    identity: &IndexMap<ObjectKey, Entity>,
    id: &EntityId,
) -> Result<Option<ObjectKey>, StorageError> {
    for kind in EntityKind::ALL {
        let key = ObjectKey::new(kind, id.clone());
        if identity.contains_key(&key) || row_exists(conn, &key)? {
            return Ok(Some(key));
        }
    }
    Ok(None)
}

fn amenity_links(conn: &Connection, place_id: &str) -> Result<Vec<EntityId>, StorageError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT amenity_id FROM {PLACE_AMENITY} WHERE place_id = ?1 ORDER BY rowid"
    ))?;
    let links = stmt
        .query_map(params![place_id], |row| row.get::<_, String>(0))?
        .map(|id| id.map(EntityId::from))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(links)
}

fn all_amenity_links(conn: &Connection) -> Result<HashMap<String, Vec<EntityId>>, StorageError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT place_id, amenity_id FROM {PLACE_AMENITY} ORDER BY rowid"
    ))?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    let mut links: HashMap<String, Vec<EntityId>> = HashMap::new();
    for row in rows {
        let (place_id, amenity_id) = row?;
        links.entry(place_id).or_default().push(EntityId::from(amenity_id));
    }
    Ok(links)
}

fn load_one(conn: &Connection, key: &ObjectKey) -> Result<Option<Entity>, StorageError> {
    let sql = format!("{} WHERE \"id\" = ?1", schema::select_sql(key.kind));
    let values = conn
        .query_row(&sql, params![key.id.as_str()], |row| row_values(row, key.kind))
        .optional()?;
    let Some(values) = values else {
        return Ok(None);
    };

    let mut entity = entity_from_row(key.kind, values)?;
    if let EntityData::Place(place) = &mut entity.data {
        place.amenity_ids = amenity_links(conn, key.id.as_str())?;
    }
    Ok(Some(entity))
}

fn load_kind(conn: &Connection, kind: EntityKind) -> Result<Vec<Entity>, StorageError> {
    let sql = format!(
        "{} ORDER BY \"created_at\", \"id\"",
        schema::select_sql(kind)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| row_values(row, kind))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut links = if kind == EntityKind::Place {
        all_amenity_links(conn)?
    } else {
        HashMap::new()
    };
    let mut entities = Vec::with_capacity(rows.len());
    for values in rows {
        let mut entity = entity_from_row(kind, values)?;
        if let EntityData::Place(place) = &mut entity.data {
            place.amenity_ids = links.remove(entity.id.as_str()).unwrap_or_default();
        }
        entities.push(entity);
    }
    Ok(entities)
}

fn insert_links(conn: &Connection, place_id: &EntityId, amenities: &[EntityId]) -> Result<(), StorageError> {
    let mut stmt = conn.prepare(&format!(
        "INSERT OR IGNORE INTO {PLACE_AMENITY} (place_id, amenity_id) VALUES (?1, ?2)"
    ))?;
    for amenity in amenities {
        stmt.execute(params![place_id.as_str(), amenity.as_str()])?;
    }
    Ok(())
}

fn insert_entity(conn: &Connection, entity: &Entity) -> Result<(), StorageError> {
    conn.execute(
        &schema::insert_sql(entity.kind()),
        params_from_iter(insert_params(entity)?),
    )?;
    if let EntityData::Place(place) = &entity.data {
        insert_links(conn, &entity.id, &place.amenity_ids)?;
    }
    Ok(())
}

fn update_entity(conn: &Connection, entity: &Entity) -> Result<(), StorageError> {
    conn.execute(
        &schema::update_sql(entity.kind()),
        params_from_iter(update_params(entity)?),
    )?;
    if let EntityData::Place(place) = &entity.data {
        conn.execute(
            &format!("DELETE FROM {PLACE_AMENITY} WHERE place_id = ?1"),
            params![entity.id.as_str()],
        )?;
        insert_links(conn, &entity.id, &place.amenity_ids)?;
    }
    Ok(())
}
