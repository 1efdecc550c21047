//! Entity views and request bodies shared by every resource.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use hbnb_core::{Entity, EntityKind};

use crate::error::ApiError;

/// Fields never exposed through the API.
const HIDDEN_FIELDS: &[(EntityKind, &str)] = &[(EntityKind::User, "password")];

/// Public JSON view of one entity: its stored fields plus `__class__`,
/// minus anything in [`HIDDEN_FIELDS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntityView(pub Map<String, Value>);

impl EntityView {
    pub fn new(entity: &Entity) -> Result<Self, ApiError> {
        let mut fields = match serde_json::to_value(entity) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                return Err(ApiError::InternalError(format!(
                    "{} did not serialize to an object",
                    entity.key()
                )))
            }
            Err(err) => return Err(ApiError::InternalError(err.to_string())),
        };
        for (kind, field) in HIDDEN_FIELDS {
            if *kind == entity.kind() {
                fields.remove(*field);
            }
        }
        Ok(EntityView(fields))
    }
}

/// Unwraps a JSON request body that must be an object.
pub fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, ApiError> {
    match body {
        Ok(Json(Value::Object(fields))) => Ok(fields),
        _ => Err(ApiError::BadRequest("Not a JSON".to_string())),
    }
}
