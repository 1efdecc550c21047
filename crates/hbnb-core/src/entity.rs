//! The [`Entity`] record shared by every kind.
//!
//! An entity is the base record (id, created_at, updated_at) plus one
//! [`EntityData`] payload. It serializes to a flat JSON object tagged with
//! `__class__`, which is exactly the per-entry shape of the file document.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::fields::{FieldAction, FieldRules};
use crate::id::{EntityId, ObjectKey};
use crate::kind::EntityKind;
use crate::models::{Amenity, City, Place, Review, State, User};

/// Type-specific payload of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum EntityData {
    State(State),
    City(City),
    Amenity(Amenity),
    User(User),
    Place(Place),
    Review(Review),
}

fn decode<T: DeserializeOwned>(kind: EntityKind, fields: Map<String, Value>) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(fields)).map_err(|err| CoreError::InvalidField {
        kind,
        reason: err.to_string(),
    })
}

fn encode<T: Serialize>(kind: EntityKind, payload: &T) -> Result<Map<String, Value>, CoreError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(CoreError::InvalidField {
            kind,
            reason: format!("payload encoded as {other}, expected an object"),
        }),
        Err(err) => Err(CoreError::InvalidField {
            kind,
            reason: err.to_string(),
        }),
    }
}

impl EntityData {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityData::State(_) => EntityKind::State,
            EntityData::City(_) => EntityKind::City,
            EntityData::Amenity(_) => EntityKind::Amenity,
            EntityData::User(_) => EntityKind::User,
            EntityData::Place(_) => EntityKind::Place,
            EntityData::Review(_) => EntityKind::Review,
        }
    }

    /// Decodes a payload of the given kind from a field map.
    ///
    /// Missing fields take their defaults; values of the wrong type fail
    /// with [`CoreError::InvalidField`].
    pub fn from_fields(kind: EntityKind, fields: Map<String, Value>) -> Result<Self, CoreError> {
        Ok(match kind {
            EntityKind::State => EntityData::State(decode(kind, fields)?),
            EntityKind::City => EntityData::City(decode(kind, fields)?),
            EntityKind::Amenity => EntityData::Amenity(decode(kind, fields)?),
            EntityKind::User => EntityData::User(decode(kind, fields)?),
            EntityKind::Place => EntityData::Place(decode(kind, fields)?),
            EntityKind::Review => EntityData::Review(decode(kind, fields)?),
        })
    }

    /// Encodes the payload as a field map (no base fields, no tag).
    pub fn to_fields(&self) -> Result<Map<String, Value>, CoreError> {
        let kind = self.kind();
        match self {
            EntityData::State(state) => encode(kind, state),
            EntityData::City(city) => encode(kind, city),
            EntityData::Amenity(amenity) => encode(kind, amenity),
            EntityData::User(user) => encode(kind, user),
            EntityData::Place(place) => encode(kind, place),
            EntityData::Review(review) => encode(kind, review),
        }
    }
}

/// One domain record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: EntityData,
}

impl Entity {
    /// Builds a new entity of `kind` from caller-supplied fields.
    ///
    /// Fields are checked against the kind's [`FieldRules`]: unknown fields
    /// are rejected, base fields are ignored, and every required field must
    /// be present and non-null. The entity gets a fresh id and
    /// `created_at == updated_at`.
    pub fn create(kind: EntityKind, fields: &Map<String, Value>) -> Result<Self, CoreError> {
        let rules = FieldRules::for_kind(kind);
        let mut accepted = Map::new();
        for (name, value) in fields {
            match rules.on_create(name) {
                FieldAction::Apply => {
                    accepted.insert(name.clone(), value.clone());
                }
                FieldAction::Ignore => {}
                FieldAction::Reject => {
                    return Err(CoreError::UnknownField {
                        kind,
                        field: name.clone(),
                    })
                }
            }
        }
        for field in rules.required {
            if accepted.get(*field).map_or(true, Value::is_null) {
                return Err(CoreError::MissingField {
                    field: (*field).to_string(),
                });
            }
        }

        let data = EntityData::from_fields(kind, accepted)?;
        let now = Utc::now();
        Ok(Entity {
            id: EntityId::generate(),
            created_at: now,
            updated_at: now,
            data,
        })
    }

    /// Rebuilds a previously stored entity without allow-list checks.
    pub fn restore(
        kind: EntityKind,
        id: EntityId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        fields: Map<String, Value>,
    ) -> Result<Self, CoreError> {
        Ok(Entity {
            id,
            created_at,
            updated_at,
            data: EntityData::from_fields(kind, fields)?,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.kind(), self.id.clone())
    }

    /// Refreshes `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Applies an update from caller-supplied fields.
    ///
    /// Mutable fields are type-checked and applied, fixed fields are ignored,
    /// unknown fields are rejected. On error the entity is left unchanged;
    /// on success `updated_at` is refreshed.
    pub fn apply_update(&mut self, patch: &Map<String, Value>) -> Result<(), CoreError> {
        let kind = self.kind();
        let rules = FieldRules::for_kind(kind);
        let mut fields = self.data.to_fields()?;
        for (name, value) in patch {
            match rules.on_update(name) {
                FieldAction::Apply => {
                    fields.insert(name.clone(), value.clone());
                }
                FieldAction::Ignore => {}
                FieldAction::Reject => {
                    return Err(CoreError::UnknownField {
                        kind,
                        field: name.clone(),
                    })
                }
            }
        }
        self.data = EntityData::from_fields(kind, fields)?;
        self.touch();
        Ok(())
    }

    /// Entities this one belongs to; deleting any of them deletes this one.
    pub fn parents(&self) -> Vec<ObjectKey> {
        match &self.data {
            EntityData::City(city) => vec![ObjectKey::new(EntityKind::State, city.state_id.clone())],
            EntityData::Place(place) => vec![
                ObjectKey::new(EntityKind::City, place.city_id.clone()),
                ObjectKey::new(EntityKind::User, place.user_id.clone()),
            ],
            EntityData::Review(review) => vec![
                ObjectKey::new(EntityKind::Place, review.place_id.clone()),
                ObjectKey::new(EntityKind::User, review.user_id.clone()),
            ],
            EntityData::State(_) | EntityData::Amenity(_) | EntityData::User(_) => Vec::new(),
        }
    }

    /// Every entity this one refers to: its parents plus linked amenities.
    pub fn references(&self) -> Vec<ObjectKey> {
        let mut refs = self.parents();
        if let EntityData::Place(place) = &self.data {
            refs.extend(
                place
                    .amenity_ids
                    .iter()
                    .map(|id| ObjectKey::new(EntityKind::Amenity, id.clone())),
            );
        }
        refs
    }
}
