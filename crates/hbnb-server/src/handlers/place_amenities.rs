//! Place to amenity link handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::schema::entities::EntityView;
use crate::state::AppState;

/// `GET /places/{place_id}/amenities`
pub async fn list_place_amenities(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Vec<EntityView>>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.place_amenities(&place_id)?))
}

/// Links an amenity; 201 for a new link, 200 if it already existed.
///
/// `POST /places/{place_id}/amenities/{amenity_id}`
pub async fn link_amenity(
    State(state): State<AppState>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<EntityView>), ApiError> {
    let mut session = state.session().await;
    let (created, amenity) = session.link_amenity(&place_id, &amenity_id)?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(amenity)))
}

/// `DELETE /places/{place_id}/amenities/{amenity_id}`
pub async fn unlink_amenity(
    State(state): State<AppState>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session().await;
    session.unlink_amenity(&place_id, &amenity_id)?;
    Ok(Json(json!({})))
}
