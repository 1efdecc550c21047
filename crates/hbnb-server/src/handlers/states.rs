//! State handlers (list, create, fetch, update, delete).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use hbnb_core::EntityKind;

use crate::error::ApiError;
use crate::schema::entities::{json_object, EntityView};
use crate::state::AppState;

pub async fn list_states(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntityView>>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.list(EntityKind::State)?))
}

/// `POST /states`
pub async fn create_state(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EntityView>), ApiError> {
    let fields = json_object(body)?;
    let mut session = state.session().await;
    let view = session.create(EntityKind::State, &fields)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /states/{id}`
pub async fn get_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.show(EntityKind::State, &id)?))
}

/// `PUT /states/{id}`
pub async fn update_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    session.show(EntityKind::State, &id)?;
    let patch = json_object(body)?;
    Ok(Json(session.update(EntityKind::State, &id, &patch)?))
}

/// Cascades to the state's cities and everything below them.
///
/// `DELETE /states/{id}`
pub async fn delete_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session().await;
    session.remove(EntityKind::State, &id)?;
    Ok(Json(json!({})))
}
