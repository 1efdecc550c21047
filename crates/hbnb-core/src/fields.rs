//! Per-kind field allow-lists.
//!
//! Each kind declares which fields must be present on creation, which may
//! change on update, and which are known but fixed once the entity exists.
//! Anything outside those lists is rejected.

use crate::kind::EntityKind;

/// Fields every entity carries; accepted in input but never applied.
pub const BASE_FIELDS: [&str; 4] = ["__class__", "id", "created_at", "updated_at"];

/// Allow-list for one entity kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    /// Must be present and non-null when the entity is created.
    pub required: &'static [&'static str],
    /// May be set on creation and changed by updates.
    pub mutable: &'static [&'static str],
    /// Part of the schema but never changed by an update.
    pub fixed: &'static [&'static str],
}

/// What to do with one incoming field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    Apply,
    Ignore,
    Reject,
}

const STATE: FieldRules = FieldRules {
    required: &["name"],
    mutable: &["name"],
    fixed: &[],
};

const CITY: FieldRules = FieldRules {
    required: &["state_id", "name"],
    mutable: &["name"],
    fixed: &["state_id"],
};

const AMENITY: FieldRules = FieldRules {
    required: &["name"],
    mutable: &["name"],
    fixed: &[],
};

const USER: FieldRules = FieldRules {
    required: &["email", "password"],
    mutable: &["password", "first_name", "last_name"],
    fixed: &["email"],
};

const PLACE: FieldRules = FieldRules {
    required: &["city_id", "user_id", "name"],
    mutable: &[
        "name",
        "description",
        "number_rooms",
        "number_bathrooms",
        "max_guest",
        "price_by_night",
        "latitude",
        "longitude",
    ],
    fixed: &["city_id", "user_id", "amenity_ids"],
};

const REVIEW: FieldRules = FieldRules {
    required: &["place_id", "user_id", "text"],
    mutable: &["text"],
    fixed: &["place_id", "user_id"],
};

impl FieldRules {
    pub fn for_kind(kind: EntityKind) -> &'static FieldRules {
        match kind {
            EntityKind::State => &STATE,
            EntityKind::City => &CITY,
            EntityKind::Amenity => &AMENITY,
            EntityKind::User => &USER,
            EntityKind::Place => &PLACE,
            EntityKind::Review => &REVIEW,
        }
    }

    fn is_fixed(&self, field: &str) -> bool {
        BASE_FIELDS.contains(&field) || self.fixed.contains(&field)
    }

    /// Classifies a field supplied when creating an entity.
    pub fn on_create(&self, field: &str) -> FieldAction {
        if self.required.contains(&field) || self.mutable.contains(&field) {
            FieldAction::Apply
        } else if self.is_fixed(field) {
            FieldAction::Ignore
        } else {
            FieldAction::Reject
        }
    }

    /// Classifies a field supplied when updating an existing entity.
    pub fn on_update(&self, field: &str) -> FieldAction {
        if self.mutable.contains(&field) {
            FieldAction::Apply
        } else if self.is_fixed(field) || self.required.contains(&field) {
            FieldAction::Ignore
        } else {
            FieldAction::Reject
        }
    }
}
