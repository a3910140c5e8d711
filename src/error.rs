// Error handling module for the Ghost Detector API
// Provides the handler-level error type and its HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use std::any::Any;
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::error::{AuthError, INTERNAL_ERROR_MESSAGE};

/// Main error type for request handlers
/// All handlers return Result<T, ApiError>
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field-level validation failures
    /// Maps to HTTP 400 with an `errors` list
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Body or query string that could not be deserialized at all
    /// Maps to HTTP 400 with a single-entry `errors` list
    #[error("Malformed {location}: {detail}")]
    MalformedRequest {
        location: &'static str,
        detail: String,
    },

    /// Authentication, authorization, registration and login failures
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No route matched
    #[error("Not found")]
    NotFound,

    /// Anything unexpected; logged, never described to the client
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// One entry of the `errors` list returned for invalid input
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

/// Flatten validator output into a stable, field-sorted list
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldError {
                field: field.to_string(),
                msg: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
            })
        })
        .collect()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ValidationError(errors) => {
                // Field names and messages only; validator params echo the rejected values
                let errors = field_errors(&errors);
                debug!("Validation error: {:?}", errors);
                let body = Json(json!({ "errors": errors }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::MalformedRequest { location, detail } => {
                debug!("Malformed {}: {}", location, detail);
                let errors = vec![FieldError {
                    field: location.to_string(),
                    msg: format!("Malformed {}", location),
                }];
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::Auth(err) => err.into_response(),
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response()
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                internal_error_response()
            }
        }
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) | ApiError::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Auth(err) => err.status_code(),
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Response for a handler that panicked; the payload is logged, not returned
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!("Handler panicked: {}", detail);
    internal_error_response()
}
