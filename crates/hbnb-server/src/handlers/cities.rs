//! City handlers. Cities are listed and created under their state.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use hbnb_core::EntityKind;

use crate::error::ApiError;
use crate::schema::entities::{json_object, EntityView};
use crate::state::AppState;

/// `GET /states/{state_id}/cities`
pub async fn list_state_cities(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
) -> Result<Json<Vec<EntityView>>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.children(EntityKind::State, &state_id, EntityKind::City)?))
}

/// Creates a city in the given state; any `state_id` in the body is replaced.
///
/// `POST /states/{state_id}/cities`
pub async fn create_city(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EntityView>), ApiError> {
    let mut session = state.session().await;
    session.show(EntityKind::State, &state_id)?;
    let fields = json_object(body)?;
    let view = session.create_under(EntityKind::State, &state_id, EntityKind::City, fields)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /cities/{id}`
pub async fn get_city(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.show(EntityKind::City, &id)?))
}

/// `PUT /cities/{id}`
pub async fn update_city(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    session.show(EntityKind::City, &id)?;
    let patch = json_object(body)?;
    Ok(Json(session.update(EntityKind::City, &id, &patch)?))
}

/// `DELETE /cities/{id}`
pub async fn delete_city(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session().await;
    session.remove(EntityKind::City, &id)?;
    Ok(Json(json!({})))
}
