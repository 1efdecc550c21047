//! StoreSession: the coordinator between HTTP handlers and the object store.
//!
//! All business logic flows through [`StoreSession`]. Handlers are thin
//! wrappers that parse the request, open a session and call one of these
//! methods. A session holds the store lock for the whole request and closes
//! the store when dropped, discarding anything that was not saved.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use tokio::sync::OwnedMutexGuard;
use tracing::error;

use hbnb_core::{Entity, EntityData, EntityId, EntityKind, ObjectKey};
use hbnb_storage::ObjectStore;

use crate::error::ApiError;
use crate::schema::entities::EntityView;
use crate::schema::index::StatsResponse;
use crate::schema::places::PlacesSearchRequest;

/// Exclusive use of the store for one request.
pub struct StoreSession {
    store: OwnedMutexGuard<Box<dyn ObjectStore + Send>>,
}

/// Field of `kind` that names the entity it is created under.
fn owner_field(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::City => Some("state_id"),
        EntityKind::Place => Some("city_id"),
        EntityKind::Review => Some("place_id"),
        EntityKind::State | EntityKind::Amenity | EntityKind::User => None,
    }
}

impl StoreSession {
    pub(crate) fn new(store: OwnedMutexGuard<Box<dyn ObjectStore + Send>>) -> Self {
        StoreSession { store }
    }

    /// Live entity count per kind.
    pub fn stats(&mut self) -> Result<StatsResponse, ApiError> {
        let mut counts = BTreeMap::new();
        for kind in EntityKind::ALL {
            counts.insert(kind.plural(), self.store.count(Some(kind))?);
        }
        Ok(StatsResponse(counts))
    }

    pub fn list(&mut self, kind: EntityKind) -> Result<Vec<EntityView>, ApiError> {
        self.store
            .all(Some(kind))?
            .values()
            .map(|entity| EntityView::new(entity))
            .collect()
    }

    pub fn show(&mut self, kind: EntityKind, id: &str) -> Result<EntityView, ApiError> {
        let entity = self
            .store
            .get(kind, id)?
            .ok_or_else(|| ApiError::missing(kind))?;
        EntityView::new(entity)
    }

    fn require(&mut self, kind: EntityKind, id: &str) -> Result<(), ApiError> {
        match self.store.get(kind, id)? {
            Some(_) => Ok(()),
            None => Err(ApiError::missing(kind)),
        }
    }

    /// Creates, registers and saves a new top-level entity.
    pub fn create(
        &mut self,
        kind: EntityKind,
        fields: &Map<String, Value>,
    ) -> Result<EntityView, ApiError> {
        let entity = Entity::create(kind, fields)?;
        let key = self.store.register(entity)?;
        self.store.save()?;
        self.show(kind, key.id.as_str())
    }

    /// Creates an entity of `kind` owned by `parent`.
    ///
    /// The owner reference comes from the path, never the body. Places and
    /// reviews also need a live `user_id` in the body.
    pub fn create_under(
        &mut self,
        parent: EntityKind,
        parent_id: &str,
        kind: EntityKind,
        mut fields: Map<String, Value>,
    ) -> Result<EntityView, ApiError> {
        self.require(parent, parent_id)?;
        if matches!(kind, EntityKind::Place | EntityKind::Review) {
            let user_id = match fields.get("user_id") {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Null) | None => {
                    return Err(ApiError::BadRequest("Missing user_id".to_string()))
                }
                Some(_) => return Err(ApiError::BadRequest("user_id must be a string".to_string())),
            };
            self.require(EntityKind::User, &user_id)?;
        }
        if let Some(field) = owner_field(kind) {
            fields.insert(field.to_string(), Value::String(parent_id.to_string()));
        }
        self.create(kind, &fields)
    }

    /// Entities of `kind` owned by `parent`.
    pub fn children(
        &mut self,
        parent: EntityKind,
        parent_id: &str,
        kind: EntityKind,
    ) -> Result<Vec<EntityView>, ApiError> {
        self.require(parent, parent_id)?;
        let owner = ObjectKey::new(parent, parent_id);
        self.store
            .all(Some(kind))?
            .values()
            .filter(|entity| entity.parents().contains(&owner))
            .map(|entity| EntityView::new(entity))
            .collect()
    }

    pub fn update(
        &mut self,
        kind: EntityKind,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Result<EntityView, ApiError> {
        let entity = self
            .store
            .get_mut(kind, id)?
            .ok_or_else(|| ApiError::missing(kind))?;
        entity.apply_update(patch)?;
        let view = EntityView::new(entity)?;
        self.store.save()?;
        Ok(view)
    }

    /// Deletes an entity and everything it owns.
    pub fn remove(&mut self, kind: EntityKind, id: &str) -> Result<(), ApiError> {
        self.require(kind, id)?;
        self.store.delete(kind, id)?;
        self.store.save()?;
        Ok(())
    }

    fn amenity_ids(&mut self, place_id: &str) -> Result<Vec<EntityId>, ApiError> {
        let place = self
            .store
            .get(EntityKind::Place, place_id)?
            .ok_or_else(|| ApiError::missing(EntityKind::Place))?;
        match &place.data {
            EntityData::Place(place) => Ok(place.amenity_ids.clone()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn place_amenities(&mut self, place_id: &str) -> Result<Vec<EntityView>, ApiError> {
        let mut views = Vec::new();
        for id in self.amenity_ids(place_id)? {
            if let Some(amenity) = self.store.get(EntityKind::Amenity, id.as_str())? {
                views.push(EntityView::new(amenity)?);
            }
        }
        Ok(views)
    }

    /// Links an amenity to a place. Returns whether a new link was made,
    /// plus the amenity.
    pub fn link_amenity(
        &mut self,
        place_id: &str,
        amenity_id: &str,
    ) -> Result<(bool, EntityView), ApiError> {
        self.require(EntityKind::Place, place_id)?;
        let amenity = self.show(EntityKind::Amenity, amenity_id)?;
        if self
            .amenity_ids(place_id)?
            .iter()
            .any(|id| id.as_str() == amenity_id)
        {
            return Ok((false, amenity));
        }

        if let Some(entity) = self.store.get_mut(EntityKind::Place, place_id)? {
            if let EntityData::Place(place) = &mut entity.data {
                place.amenity_ids.push(EntityId::from(amenity_id));
            }
            entity.touch();
        }
        self.store.save()?;
        Ok((true, amenity))
    }

    pub fn unlink_amenity(&mut self, place_id: &str, amenity_id: &str) -> Result<(), ApiError> {
        self.require(EntityKind::Place, place_id)?;
        self.require(EntityKind::Amenity, amenity_id)?;
        if !self
            .amenity_ids(place_id)?
            .iter()
            .any(|id| id.as_str() == amenity_id)
        {
            return Err(ApiError::NotFound(
                "Amenity not linked to place".to_string(),
            ));
        }

        if let Some(entity) = self.store.get_mut(EntityKind::Place, place_id)? {
            if let EntityData::Place(place) = &mut entity.data {
                place.amenity_ids.retain(|id| id.as_str() != amenity_id);
            }
            entity.touch();
        }
        self.store.save()?;
        Ok(())
    }

    /// Places matching a search.
    ///
    /// States and cities select places by location (union of both); with
    /// neither, every place is a candidate. Amenities then keep only places
    /// linked to all of them.
    pub fn search_places(
        &mut self,
        request: &PlacesSearchRequest,
    ) -> Result<Vec<EntityView>, ApiError> {
        let by_location = request.filters_by_location();
        let city_states: HashMap<EntityId, EntityId> = self
            .store
            .all(Some(EntityKind::City))?
            .values()
            .filter_map(|entity| match &entity.data {
                EntityData::City(city) => Some((entity.id.clone(), city.state_id.clone())),
                _ => None,
            })
            .collect();

        let in_location = |city_id: &EntityId| {
            request.cities.contains(city_id)
                || city_states
                    .get(city_id)
                    .is_some_and(|state| request.states.contains(state))
        };

        let places = self.store.all(Some(EntityKind::Place))?;
        places
            .values()
            .filter(|entity| match &entity.data {
                EntityData::Place(place) => {
                    (!by_location || in_location(&place.city_id))
                        && request
                            .amenities
                            .iter()
                            .all(|amenity| place.amenity_ids.contains(amenity))
                }
                _ => false,
            })
            .map(|entity| EntityView::new(entity))
            .collect()
    }
}

impl Drop for StoreSession {
    fn drop(&mut self) {
        if let Err(err) = self.store.close() {
            error!(%err, "failed to close store session");
        }
    }
}
