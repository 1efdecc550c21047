//! Place handlers, plus the cross-entity place search.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use hbnb_core::EntityKind;

use crate::error::ApiError;
use crate::schema::entities::{json_object, EntityView};
use crate::schema::places::PlacesSearchRequest;
use crate::state::AppState;

/// `GET /cities/{city_id}/places`
pub async fn list_city_places(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
) -> Result<Json<Vec<EntityView>>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.children(EntityKind::City, &city_id, EntityKind::Place)?))
}

/// Creates a place in a city, hosted by the body's `user_id`.
///
/// `POST /cities/{city_id}/places`
pub async fn create_place(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EntityView>), ApiError> {
    let mut session = state.session().await;
    session.show(EntityKind::City, &city_id)?;
    let fields = json_object(body)?;
    let view = session.create_under(EntityKind::City, &city_id, EntityKind::Place, fields)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /places/{id}`
pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.show(EntityKind::Place, &id)?))
}

/// `PUT /places/{id}`
pub async fn update_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    session.show(EntityKind::Place, &id)?;
    let patch = json_object(body)?;
    Ok(Json(session.update(EntityKind::Place, &id, &patch)?))
}

/// `DELETE /places/{id}`
pub async fn delete_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session().await;
    session.remove(EntityKind::Place, &id)?;
    Ok(Json(json!({})))
}

/// Searches places by state, city and amenity.
///
/// `POST /places_search`
pub async fn places_search(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<EntityView>>, ApiError> {
    let filters = json_object(body)?;
    let request: PlacesSearchRequest = serde_json::from_value(Value::Object(filters))
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let mut session = state.session().await;
    Ok(Json(session.search_places(&request)?))
}
