//! Conversions between [`Entity`] values and flat SQLite rows.
//!
//! A row is `id, created_at, updated_at` followed by the kind's columns from
//! [`schema::columns`]. Timestamps are stored as RFC 3339 text with
//! nanosecond precision so they sort lexically and round-trip exactly.
//! Place amenity links live in their own table and are not part of the row.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value as SqlValue;
use serde_json::{Map, Number, Value};

use hbnb_core::{Entity, EntityId, EntityKind};

use crate::error::StorageError;
use crate::schema;

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| StorageError::ReconstructionError {
            reason: format!("bad timestamp '{text}': {err}"),
        })
}

/// Maps a JSON field value onto a SQLite value.
pub fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => SqlValue::Integer(i),
            (None, Some(f)) => SqlValue::Real(f),
            (None, None) => SqlValue::Text(n.to_string()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// Maps a SQLite value back onto JSON.
pub fn sql_to_json(value: SqlValue) -> Result<Value, StorageError> {
    Ok(match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => Number::from_f64(f).map(Value::Number).ok_or_else(|| {
            StorageError::ReconstructionError {
                reason: format!("non-finite real {f}"),
            }
        })?,
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(_) => {
            return Err(StorageError::ReconstructionError {
                reason: "unexpected blob column".to_string(),
            })
        }
    })
}

/// Column values of an entity, in [`schema::columns`] order.
fn column_values(entity: &Entity) -> Result<Vec<SqlValue>, StorageError> {
    let fields = entity.data.to_fields()?;
    Ok(schema::columns(entity.kind())
        .iter()
        .map(|col| fields.get(*col).map_or(SqlValue::Null, json_to_sql))
        .collect())
}

/// Parameters for [`schema::insert_sql`].
pub fn insert_params(entity: &Entity) -> Result<Vec<SqlValue>, StorageError> {
    let mut params = vec![
        SqlValue::Text(entity.id.to_string()),
        SqlValue::Text(format_timestamp(&entity.created_at)),
        SqlValue::Text(format_timestamp(&entity.updated_at)),
    ];
    params.extend(column_values(entity)?);
    Ok(params)
}

/// Parameters for [`schema::update_sql`].
pub fn update_params(entity: &Entity) -> Result<Vec<SqlValue>, StorageError> {
    let mut params = vec![SqlValue::Text(format_timestamp(&entity.updated_at))];
    params.extend(column_values(entity)?);
    params.push(SqlValue::Text(entity.id.to_string()));
    Ok(params)
}

/// Reads the raw values of a row selected with [`schema::select_sql`].
pub fn row_values(row: &rusqlite::Row<'_>, kind: EntityKind) -> rusqlite::Result<Vec<SqlValue>> {
    (0..schema::columns(kind).len() + 3)
        .map(|i| row.get::<_, SqlValue>(i))
        .collect()
}

fn text(value: SqlValue, column: &str) -> Result<String, StorageError> {
    match value {
        SqlValue::Text(s) => Ok(s),
        other => Err(StorageError::ReconstructionError {
            reason: format!("column {column} holds {other:?}, expected text"),
        }),
    }
}

/// Rebuilds an entity from raw row values. Place amenity links are left
/// empty for the caller to fill.
pub fn entity_from_row(kind: EntityKind, values: Vec<SqlValue>) -> Result<Entity, StorageError> {
    let columns = schema::columns(kind);
    if values.len() != columns.len() + 3 {
        return Err(StorageError::ReconstructionError {
            reason: format!(
                "{} row has {} values, expected {}",
                kind,
                values.len(),
                columns.len() + 3
            ),
        });
    }

    let mut values = values.into_iter();
    let mut next = || values.next().unwrap_or(SqlValue::Null);
    let id = EntityId::from(text(next(), "id")?);
    let created_at = parse_timestamp(&text(next(), "created_at")?)?;
    let updated_at = parse_timestamp(&text(next(), "updated_at")?)?;

    let mut fields = Map::new();
    for col in columns {
        fields.insert((*col).to_string(), sql_to_json(next())?);
    }
    Ok(Entity::restore(kind, id, created_at, updated_at, fields)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamps_round_trip_exactly() {
        let now = Utc::now();
        assert_eq!(parse_timestamp(&format_timestamp(&now)).unwrap(), now);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn json_numbers_keep_their_class() {
        assert_eq!(json_to_sql(&json!(3)), SqlValue::Integer(3));
        assert_eq!(json_to_sql(&json!(37.77)), SqlValue::Real(37.77));
        assert_eq!(json_to_sql(&json!(null)), SqlValue::Null);
        assert_eq!(json_to_sql(&json!("x")), SqlValue::Text("x".into()));
    }

    #[test]
    fn blobs_are_rejected() {
        assert!(matches!(
            sql_to_json(SqlValue::Blob(vec![1])),
            Err(StorageError::ReconstructionError { .. })
        ));
    }

    #[test]
    fn place_row_rebuilds_entity() {
        let fields = match json!({"city_id": "c", "user_id": "u", "name": "Loft", "latitude": 1.5}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let place = Entity::create(EntityKind::Place, &fields).unwrap();
        let back = entity_from_row(EntityKind::Place, insert_params(&place).unwrap()).unwrap();
        assert_eq!(back, place);
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = entity_from_row(EntityKind::State, vec![SqlValue::Text("id".into())]).unwrap_err();
        assert!(matches!(err, StorageError::ReconstructionError { .. }));
    }
}
