//! Type-specific fields of the six entity kinds.
//!
//! These structs carry only the per-kind payload; id and timestamps live on
//! [`Entity`](crate::entity::Entity). Every field has a default so partial
//! field maps decode, with required fields enforced by [`crate::fields`].

use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// A state or province.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    pub name: String,
}

/// A city, owned by a [`State`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct City {
    pub state_id: EntityId,
    pub name: String,
}

/// A feature a place can offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Amenity {
    pub name: String,
}

/// An account that owns places and writes reviews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A rentable place in a [`City`], hosted by a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    pub city_id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub number_rooms: u32,
    pub number_bathrooms: u32,
    pub max_guest: u32,
    pub price_by_night: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Linked amenities, in link order.
    pub amenity_ids: Vec<EntityId>,
}

/// A user's review of a [`Place`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub place_id: EntityId,
    pub user_id: EntityId,
    pub text: String,
}
