//! Amenity handlers (list, create, fetch, update, delete).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use hbnb_core::EntityKind;

use crate::error::ApiError;
use crate::schema::entities::{json_object, EntityView};
use crate::state::AppState;

/// `GET /amenities`
pub async fn list_amenities(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntityView>>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.list(EntityKind::Amenity)?))
}

/// `POST /amenities`
pub async fn create_amenity(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EntityView>), ApiError> {
    let fields = json_object(body)?;
    let mut session = state.session().await;
    let view = session.create(EntityKind::Amenity, &fields)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /amenities/{id}`
pub async fn get_amenity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.show(EntityKind::Amenity, &id)?))
}

/// `PUT /amenities/{id}`
pub async fn update_amenity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    session.show(EntityKind::Amenity, &id)?;
    let patch = json_object(body)?;
    Ok(Json(session.update(EntityKind::Amenity, &id, &patch)?))
}

/// Also unlinks the amenity from every place.
///
/// `DELETE /amenities/{id}`
pub async fn delete_amenity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session().await;
    session.remove(EntityKind::Amenity, &id)?;
    Ok(Json(json!({})))
}
