//! End-to-end tests for the HBnB HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! StoreSession -> ObjectStore -> HTTP response. Each test builds a fresh
//! AppState and sends requests with `tower::ServiceExt::oneshot`, without
//! starting a network server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use hbnb_server::router::build_router;
use hbnb_server::state::AppState;
use hbnb_storage::FileStore;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Creates a fresh router backed by an in-memory database.
fn test_app() -> Router {
    let state = AppState::in_memory().expect("failed to create in-memory AppState");
    build_router(state)
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    (status, json)
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, "GET", path, None).await
}

async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", path, Some(body)).await
}

async fn put_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", path, Some(body)).await
}

async fn delete(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, "DELETE", path, None).await
}

/// Creates a state, city, user and place; returns their ids.
async fn seed(app: &Router) -> (String, String, String, String) {
    let (_, state) = post_json(app, "/api/v1/states", json!({"name": "California"})).await;
    let state_id = state["id"].as_str().unwrap().to_string();
    let (_, city) = post_json(
        app,
        &format!("/api/v1/states/{state_id}/cities"),
        json!({"name": "San Francisco"}),
    )
    .await;
    let city_id = city["id"].as_str().unwrap().to_string();
    let (_, user) = post_json(
        app,
        "/api/v1/users",
        json!({"email": "host@example.com", "password": "pw"}),
    )
    .await;
    let user_id = user["id"].as_str().unwrap().to_string();
    let (_, place) = post_json(
        app,
        &format!("/api/v1/cities/{city_id}/places"),
        json!({"user_id": user_id, "name": "Loft"}),
    )
    .await;
    let place_id = place["id"].as_str().unwrap().to_string();
    (state_id, city_id, user_id, place_id)
}

fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_is_ok() {
    let app = test_app();
    let (status, body) = get_json(&app, "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK"}));
}

#[tokio::test]
async fn stats_count_every_kind() {
    let app = test_app();
    seed(&app).await;
    let (status, body) = get_json(&app, "/api/v1/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"amenities": 0, "cities": 1, "places": 1, "reviews": 0, "states": 1, "users": 1})
    );
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = test_app();
    let (status, body) = get_json(&app, "/api/v1/castles").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(error_message(&body), "Not found");
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn state_lifecycle() {
    let app = test_app();
    let (status, state) = post_json(&app, "/api/v1/states", json!({"name": "Nevada"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(state["__class__"], "State");
    assert_eq!(state["created_at"], state["updated_at"]);
    let id = state["id"].as_str().unwrap();

    let (status, fetched) = get_json(&app, &format!("/api/v1/states/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, state);

    let (status, updated) = put_json(
        &app,
        &format!("/api/v1/states/{id}"),
        json!({"name": "Silver State", "id": "ignored", "created_at": "ignored"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Silver State");
    assert_eq!(updated["id"], id);
    assert_eq!(updated["created_at"], state["created_at"]);

    let (status, body) = delete(&app, &format!("/api/v1/states/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, _) = get_json(&app, &format!("/api/v1/states/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_validates_body() {
    let app = test_app();

    let (status, body) = post_json(&app, "/api/v1/states", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Missing name");

    let (status, body) = post_json(&app, "/api/v1/states", json!(["Nevada"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Not a JSON");

    let (status, _) = post_json(&app, "/api/v1/amenities", json!({"name": "Wifi", "speed": 9})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&app, "/api/v1/users", json!({"email": "a@b.c"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Missing password");
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/states")
        .header("content-type", "text/plain")
        .body(Body::from("name=Nevada"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_views_hide_password() {
    let app = test_app();
    let (status, user) = post_json(
        &app,
        "/api/v1/users",
        json!({"email": "a@b.c", "password": "secret", "first_name": "Ada"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password").is_none());

    let (_, users) = get_json(&app, "/api/v1/users").await;
    assert!(users.as_array().unwrap().iter().all(|u| u.get("password").is_none()));

    let id = user["id"].as_str().unwrap();
    let (_, updated) = put_json(
        &app,
        &format!("/api/v1/users/{id}"),
        json!({"email": "new@b.c", "last_name": "Lovelace"}),
    )
    .await;
    assert_eq!(updated["email"], "a@b.c");
    assert_eq!(updated["last_name"], "Lovelace");
}

// ---------------------------------------------------------------------------
// Nested resources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cities_belong_to_their_state() {
    let app = test_app();
    let (state_id, city_id, _, _) = seed(&app).await;

    let (status, cities) = get_json(&app, &format!("/api/v1/states/{state_id}/cities")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cities.as_array().unwrap().len(), 1);
    assert_eq!(cities[0]["id"], city_id.as_str());
    assert_eq!(cities[0]["state_id"], state_id.as_str());

    let (status, _) = get_json(&app, "/api/v1/states/nowhere/cities").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(&app, "/api/v1/states/nowhere/cities", json!({"name": "X"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn place_creation_checks_owner() {
    let app = test_app();
    let (_, city_id, _, _) = seed(&app).await;
    let path = format!("/api/v1/cities/{city_id}/places");

    let (status, body) = post_json(&app, &path, json!({"name": "Loft"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Missing user_id");

    let (status, body) = post_json(&app, &path, json!({"user_id": "ghost", "name": "Loft"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "User not found");
}

#[tokio::test]
async fn place_updates_ignore_fixed_fields() {
    let app = test_app();
    let (_, city_id, _, place_id) = seed(&app).await;

    let (status, place) = put_json(
        &app,
        &format!("/api/v1/places/{place_id}"),
        json!({"city_id": "elsewhere", "price_by_night": 80, "latitude": 37.77}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(place["city_id"], city_id.as_str());
    assert_eq!(place["price_by_night"], 80);
    assert_eq!(place["latitude"], 37.77);
}

#[tokio::test]
async fn reviews_round_trip() {
    let app = test_app();
    let (_, _, user_id, place_id) = seed(&app).await;

    let (status, review) = post_json(
        &app,
        &format!("/api/v1/places/{place_id}/reviews"),
        json!({"user_id": user_id, "text": "Great view"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["place_id"], place_id.as_str());

    let (_, reviews) = get_json(&app, &format!("/api/v1/places/{place_id}/reviews")).await;
    assert_eq!(reviews.as_array().unwrap().len(), 1);

    let (status, body) = post_json(
        &app,
        &format!("/api/v1/places/{place_id}/reviews"),
        json!({"user_id": user_id}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Missing text");
}

#[tokio::test]
async fn deleting_a_user_cascades_to_places() {
    let app = test_app();
    let (_, _, user_id, place_id) = seed(&app).await;

    let (status, _) = delete(&app, &format!("/api/v1/users/{user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(&app, &format!("/api/v1/places/{place_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Amenity links and search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn amenity_links() {
    let app = test_app();
    let (_, _, _, place_id) = seed(&app).await;
    let (_, wifi) = post_json(&app, "/api/v1/amenities", json!({"name": "Wifi"})).await;
    let wifi_id = wifi["id"].as_str().unwrap();
    let link = format!("/api/v1/places/{place_id}/amenities/{wifi_id}");

    let (status, body) = post_json(&app, &link, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Wifi");
    let (status, _) = post_json(&app, &link, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, linked) = get_json(&app, &format!("/api/v1/places/{place_id}/amenities")).await;
    assert_eq!(linked.as_array().unwrap().len(), 1);

    let (status, _) = delete(&app, &link).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = delete(&app, &link).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn places_search_filters() {
    let app = test_app();
    let (state_id, city_id, user_id, loft_id) = seed(&app).await;
    let (_, other_state) = post_json(&app, "/api/v1/states", json!({"name": "Oregon"})).await;
    let other_state_id = other_state["id"].as_str().unwrap().to_string();
    let (_, portland) = post_json(
        &app,
        &format!("/api/v1/states/{other_state_id}/cities"),
        json!({"name": "Portland"}),
    )
    .await;
    let portland_id = portland["id"].as_str().unwrap().to_string();
    let (_, cabin) = post_json(
        &app,
        &format!("/api/v1/cities/{portland_id}/places"),
        json!({"user_id": user_id, "name": "Cabin"}),
    )
    .await;
    let cabin_id = cabin["id"].as_str().unwrap().to_string();
    let (_, wifi) = post_json(&app, "/api/v1/amenities", json!({"name": "Wifi"})).await;
    let wifi_id = wifi["id"].as_str().unwrap().to_string();
    post_json(
        &app,
        &format!("/api/v1/places/{cabin_id}/amenities/{wifi_id}"),
        json!({}),
    )
    .await;

    let ids = |body: &Value| -> Vec<String> {
        let mut ids: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        ids
    };
    let sorted = |mut v: Vec<String>| {
        v.sort();
        v
    };

    let (status, all) = post_json(&app, "/api/v1/places_search", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&all), sorted(vec![loft_id.clone(), cabin_id.clone()]));

    let (_, by_state) = post_json(&app, "/api/v1/places_search", json!({"states": [state_id]})).await;
    assert_eq!(ids(&by_state), vec![loft_id.clone()]);

    let (_, union) = post_json(
        &app,
        "/api/v1/places_search",
        json!({"states": [state_id], "cities": [portland_id]}),
    )
    .await;
    assert_eq!(ids(&union), sorted(vec![loft_id.clone(), cabin_id.clone()]));

    let (_, by_amenity) =
        post_json(&app, "/api/v1/places_search", json!({"amenities": [wifi_id]})).await;
    assert_eq!(ids(&by_amenity), vec![cabin_id.clone()]);

    let (_, none) = post_json(
        &app,
        "/api/v1/places_search",
        json!({"cities": [city_id], "amenities": [wifi_id]}),
    )
    .await;
    assert!(none.as_array().unwrap().is_empty());

    let (status, _) = send(&app, "POST", "/api/v1/places_search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn file_backend_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.json");

    let app = build_router(AppState::from_store(Box::new(FileStore::open(&path).unwrap())));
    let (status, state) = post_json(&app, "/api/v1/states", json!({"name": "Texas"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = state["id"].as_str().unwrap().to_string();
    drop(app);

    let app = build_router(AppState::from_store(Box::new(FileStore::open(&path).unwrap())));
    let (status, fetched) = get_json(&app, &format!("/api/v1/states/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Texas");
}

#[tokio::test]
async fn failed_save_is_not_visible_to_later_requests() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("later");
    let path = target.join("file.json");

    let app = build_router(AppState::from_store(Box::new(FileStore::new(&path))));
    let (status, _) = post_json(&app, "/api/v1/states", json!({"name": "Ghost"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (_, listed) = get_json(&app, "/api/v1/states").await;
    assert_eq!(listed.as_array().unwrap().len(), 0);

    std::fs::create_dir(&target).unwrap();
    let (status, _) = post_json(&app, "/api/v1/states", json!({"name": "Real"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let document = std::fs::read_to_string(&path).unwrap();
    assert!(!document.contains("Ghost"));
    assert!(document.contains("Real"));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_all_reach_the_document() {
    const REQUESTS: usize = 24;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.json");
    let app = build_router(AppState::from_store(Box::new(FileStore::open(&path).unwrap())));

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..REQUESTS {
        let app = app.clone();
        tasks.spawn(async move {
            post_json(&app, "/api/v1/amenities", json!({"name": format!("Amenity {i}")})).await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        let (status, body) = joined.unwrap();
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let document: serde_json::Map<String, Value> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(document.len(), REQUESTS);
    assert!(document.keys().all(|key| key.starts_with("Amenity.")));

    let reopened = build_router(AppState::from_store(Box::new(FileStore::open(&path).unwrap())));
    let (_, stats) = get_json(&reopened, "/api/v1/stats").await;
    assert_eq!(stats["amenities"], REQUESTS);
}
