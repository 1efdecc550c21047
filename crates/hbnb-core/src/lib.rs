//! Entity model for the HBnB object store.
//!
//! Defines the six entity kinds, their identifiers and object keys, the
//! [`Entity`] record with its type-specific payloads, and the per-kind field
//! allow-lists that govern creation and updates.
//!
//! # Modules
//!
//! - [`kind`]: EntityKind, the closed set of entity types
//! - [`id`]: EntityId and ObjectKey (`<Kind>.<id>`)
//! - [`models`]: per-kind payload structs
//! - [`fields`]: FieldRules allow-lists
//! - [`entity`]: Entity, EntityData, create/update validation
//! - [`error`]: CoreError

pub mod entity;
pub mod error;
pub mod fields;
pub mod id;
pub mod kind;
pub mod models;

// Re-export commonly used types
pub use entity::{Entity, EntityData};
pub use error::CoreError;
pub use fields::FieldRules;
pub use id::{EntityId, ObjectKey};
pub use kind::EntityKind;
pub use models::{Amenity, City, Place, Review, State, User};
