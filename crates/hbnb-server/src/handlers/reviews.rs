//! Review handlers. Reviews are listed and created under their place.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use hbnb_core::EntityKind;

use crate::error::ApiError;
use crate::schema::entities::{json_object, EntityView};
use crate::state::AppState;

/// `GET /places/{place_id}/reviews`
pub async fn list_place_reviews(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Vec<EntityView>>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.children(EntityKind::Place, &place_id, EntityKind::Review)?))
}

/// `POST /places/{place_id}/reviews`
pub async fn create_review(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EntityView>), ApiError> {
    let mut session = state.session().await;
    session.show(EntityKind::Place, &place_id)?;
    let fields = json_object(body)?;
    let view = session.create_under(EntityKind::Place, &place_id, EntityKind::Review, fields)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.show(EntityKind::Review, &id)?))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EntityView>, ApiError> {
    let mut session = state.session().await;
    session.show(EntityKind::Review, &id)?;
    let patch = json_object(body)?;
    Ok(Json(session.update(EntityKind::Review, &id, &patch)?))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session().await;
    session.remove(EntityKind::Review, &id)?;
    Ok(Json(json!({})))
}
