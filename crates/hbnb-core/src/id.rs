//! Identifier newtypes for stored entities.
//!
//! [`EntityId`] is a UUID v4 string unique across all kinds. [`ObjectKey`]
//! pairs it with the kind and renders as `<Kind>.<id>`, the key format of the
//! file document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::kind::EntityKind;

/// Opaque entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        EntityId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId(id)
    }
}

/// Registry key: the entity's kind plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl ObjectKey {
    pub fn new(kind: EntityKind, id: impl Into<EntityId>) -> Self {
        ObjectKey {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.id)
    }
}

impl FromStr for ObjectKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s.split_once('.').ok_or_else(|| CoreError::InvalidKey {
            key: s.to_string(),
            reason: "expected <Kind>.<id>".to_string(),
        })?;
        if id.is_empty() {
            return Err(CoreError::InvalidKey {
                key: s.to_string(),
                reason: "empty id".to_string(),
            });
        }
        Ok(ObjectKey::new(kind.parse()?, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(EntityId::generate(), EntityId::generate());
    }

    #[test]
    fn key_display_and_parse() {
        let key = ObjectKey::new(EntityKind::Place, "4f1c");
        assert_eq!(key.to_string(), "Place.4f1c");
        assert_eq!("Place.4f1c".parse::<ObjectKey>().unwrap(), key);
    }

    #[test]
    fn key_parse_failures() {
        assert!(matches!(
            "Place".parse::<ObjectKey>(),
            Err(CoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            "Place.".parse::<ObjectKey>(),
            Err(CoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            "Castle.1".parse::<ObjectKey>(),
            Err(CoreError::UnknownKind { .. })
        ));
    }
}
