//! The closed set of entity kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the six entity types in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    State,
    City,
    Amenity,
    User,
    Place,
    Review,
}

impl EntityKind {
    /// Every kind, parents before the kinds that reference them.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::State,
        EntityKind::City,
        EntityKind::Amenity,
        EntityKind::User,
        EntityKind::Place,
        EntityKind::Review,
    ];

    /// The class name used in object keys and the `__class__` tag.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::State => "State",
            EntityKind::City => "City",
            EntityKind::Amenity => "Amenity",
            EntityKind::User => "User",
            EntityKind::Place => "Place",
            EntityKind::Review => "Review",
        }
    }

    /// Lower-case plural, used for table names and stats keys.
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::State => "states",
            EntityKind::City => "cities",
            EntityKind::Amenity => "amenities",
            EntityKind::User => "users",
            EntityKind::Place => "places",
            EntityKind::Review => "reviews",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownKind {
                name: s.to_string(),
            })
    }
}
