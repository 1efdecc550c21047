//! Service status and statistics handlers.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::index::{StatsResponse, StatusResponse};
use crate::state::AppState;

/// `GET /status`
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse { status: "OK" })
}

/// Counts live entities of every kind.
///
/// `GET /stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let mut session = state.session().await;
    Ok(Json(session.stats()?))
}
