//! Core error types for hbnb-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! ways an entity can fail to be named, built, or updated.

use thiserror::Error;

use crate::kind::EntityKind;

/// Core errors produced by the hbnb-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A kind name did not match any of the six entity kinds.
    #[error("unknown entity kind: '{name}'")]
    UnknownKind { name: String },

    /// An object key was not of the form `<Kind>.<id>`.
    #[error("invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// A field is not part of the kind's schema.
    #[error("unknown field '{field}' for {kind}")]
    UnknownField { kind: EntityKind, field: String },

    /// A required field was absent or null on creation.
    #[error("Missing {field}")]
    MissingField { field: String },

    /// A field value did not have the declared type.
    #[error("invalid {kind} field: {reason}")]
    InvalidField { kind: EntityKind, reason: String },
}
