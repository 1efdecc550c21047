//! Place search request types.

use serde::Deserialize;

use hbnb_core::EntityId;

/// Body of `POST /places_search`. Every filter is optional; an absent or
/// empty filter does not restrict the result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlacesSearchRequest {
    /// Places in any city of these states.
    pub states: Vec<EntityId>,
    /// Places in these cities, unioned with the state filter.
    pub cities: Vec<EntityId>,
    /// Only places linked to every one of these amenities.
    pub amenities: Vec<EntityId>,
}

impl PlacesSearchRequest {
    /// Whether states or cities narrow the candidate places.
    pub fn filters_by_location(&self) -> bool {
        !self.states.is_empty() || !self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_states_or_cities_filter_by_location() {
        let request: PlacesSearchRequest =
            serde_json::from_str(r#"{"amenities": ["a1"]}"#).unwrap();
        assert!(!request.filters_by_location());

        let request: PlacesSearchRequest = serde_json::from_str(r#"{"cities": ["c1"]}"#).unwrap();
        assert!(request.filters_by_location());
    }
}
