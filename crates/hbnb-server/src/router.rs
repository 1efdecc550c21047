//! Router assembly for the HBnB HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes under
//! `/api/v1`, with CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, amenities, cities, index, place_amenities, places, reviews, states, users};
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. Unrouted paths get a JSON
/// 404 body.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/status", get(index::status))
        .route("/stats", get(index::stats))
        // States and their cities
        .route("/states", get(states::list_states).post(states::create_state))
        .route(
            "/states/{id}",
            get(states::get_state)
                .put(states::update_state)
                .delete(states::delete_state),
        )
        .route(
            "/states/{id}/cities",
            get(cities::list_state_cities).post(cities::create_city),
        )
        .route(
            "/cities/{id}",
            get(cities::get_city)
                .put(cities::update_city)
                .delete(cities::delete_city),
        )
        // Amenities
        .route(
            "/amenities",
            get(amenities::list_amenities).post(amenities::create_amenity),
        )
        .route(
            "/amenities/{id}",
            get(amenities::get_amenity)
                .put(amenities::update_amenity)
                .delete(amenities::delete_amenity),
        )
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Places
        .route(
            "/cities/{id}/places",
            get(places::list_city_places).post(places::create_place),
        )
        .route(
            "/places/{id}",
            get(places::get_place)
                .put(places::update_place)
                .delete(places::delete_place),
        )
        .route("/places_search", post(places::places_search))
        // Reviews
        .route(
            "/places/{id}/reviews",
            get(reviews::list_place_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        // Place <-> amenity links
        .route(
            "/places/{id}/amenities",
            get(place_amenities::list_place_amenities),
        )
        .route(
            "/places/{id}/amenities/{amenity_id}",
            post(place_amenities::link_amenity).delete(place_amenities::unlink_amenity),
        );

    Router::new()
        .nest("/api/v1", api)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
