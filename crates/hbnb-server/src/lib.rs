//! HTTP/JSON API server for HBnB.
//!
//! Exposes states, cities, amenities, users, places and reviews as REST
//! resources under `/api/v1`, backed by whichever [`hbnb_storage`] backend
//! the environment selects. This crate contains the router, handlers, API
//! schema types, error mapping and the per-request store session.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
