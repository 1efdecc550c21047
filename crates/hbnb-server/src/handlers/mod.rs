//! HTTP handler modules for the HBnB API.
//!
//! Each sub-module implements thin handlers that parse requests, open a
//! [`StoreSession`](crate::service::StoreSession), delegate to it, and return
//! JSON responses. No business logic lives in handlers.

pub mod amenities;
pub mod cities;
pub mod index;
pub mod place_amenities;
pub mod places;
pub mod reviews;
pub mod states;
pub mod users;

use crate::error::ApiError;

/// Fallback for every unrouted path.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
