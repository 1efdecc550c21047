//! User handlers (list, create, fetch, update, delete).
//!
//! Views never carry the password; see [`EntityView`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use hbnb_core::EntityKind;

use crate::error::ApiError;
use crate::schema::entities::{json_object, EntityView};
use crate::state::AppState;

/// `GET /users`
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntityView>>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.list(EntityKind::User)?))
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EntityView>), ApiError> {
    let fields = json_object(body)?;
    let mut session = state.session().await;
    let view = session.create(EntityKind::User, &fields)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.show(EntityKind::User, &id)?))
}

/// `email` is fixed once the user exists and is ignored here.
///
/// `PUT /users/{id}`
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    session.show(EntityKind::User, &id)?;
    let patch = json_object(body)?;
    Ok(Json(session.update(EntityKind::User, &id, &patch)?))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session().await;
    session.remove(EntityKind::User, &id)?;
    Ok(Json(json!({})))
}
