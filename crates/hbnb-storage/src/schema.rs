//! Relational schema and migration setup for the SQLite backend.
//!
//! One table per entity kind, named by [`EntityKind::plural`], plus the
//! `place_amenity` link table. Migrations are embedded with `include_str!`
//! and tracked through SQLite's `user_version` pragma.

use std::path::Path;

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};
use tracing::info;

use hbnb_core::EntityKind;

use crate::error::StorageError;

/// Link table between places and amenities.
pub const PLACE_AMENITY: &str = "place_amenity";

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(include_str!("migrations/001_initial_schema.sql"))])
}

/// Opens (or creates) the database at `path` with pragmas set and all
/// migrations applied.
pub fn open_database(path: &Path) -> Result<Connection, StorageError> {
    let mut conn = Connection::open(path)?;
    configure(&conn)?;
    migrate(&mut conn)?;
    Ok(conn)
}

/// Opens a private in-memory database, for tests.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let mut conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrate(&mut conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<(), StorageError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    // Off by default in SQLite; cascading deletes depend on it.
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

/// Applies pending migrations. A no-op when the schema is current.
pub fn migrate(conn: &mut Connection) -> Result<(), StorageError> {
    let before = user_version(conn)?;
    migrations()
        .to_latest(conn)
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    let after = user_version(conn)?;
    if after != before {
        info!(from = before, to = after, "applied schema migrations");
    }
    Ok(())
}

fn user_version(conn: &Connection) -> Result<i64, StorageError> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Type-specific columns of a kind's table, in declaration order.
pub fn columns(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::State => &["name"],
        EntityKind::City => &["state_id", "name"],
        EntityKind::Amenity => &["name"],
        EntityKind::User => &["email", "password", "first_name", "last_name"],
        EntityKind::Place => &[
            "city_id",
            "user_id",
            "name",
            "description",
            "number_rooms",
            "number_bathrooms",
            "max_guest",
            "price_by_night",
            "latitude",
            "longitude",
        ],
        EntityKind::Review => &["place_id", "user_id", "text"],
    }
}

pub fn table(kind: EntityKind) -> &'static str {
    kind.plural()
}

/// `SELECT id, created_at, updated_at, <columns> FROM <table>`
pub fn select_sql(kind: EntityKind) -> String {
    format!(
        "SELECT \"id\", \"created_at\", \"updated_at\", {} FROM \"{}\"",
        quoted(columns(kind)),
        table(kind)
    )
}

pub fn insert_sql(kind: EntityKind) -> String {
    let cols = columns(kind);
    let placeholders: Vec<String> = (1..=cols.len() + 3).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO \"{}\" (\"id\", \"created_at\", \"updated_at\", {}) VALUES ({})",
        table(kind),
        quoted(cols),
        placeholders.join(", ")
    )
}

/// Updates everything but `id` and `created_at`; the id binds last.
pub fn update_sql(kind: EntityKind) -> String {
    let cols = columns(kind);
    let assignments: Vec<String> = std::iter::once("updated_at")
        .chain(cols.iter().copied())
        .enumerate()
        .map(|(i, col)| format!("\"{col}\" = ?{}", i + 1))
        .collect();
    format!(
        "UPDATE \"{}\" SET {} WHERE \"id\" = ?{}",
        table(kind),
        assignments.join(", "),
        cols.len() + 2
    )
}

fn quoted(cols: &[&str]) -> String {
    cols.iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
