// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::models::Role;

/// Authentication and authorization error types
///
/// The wire mapping deliberately collapses some variants: an expired token and
/// a token with a bad signature produce the same response, and an unknown
/// username produces the same response as a wrong password.
#[derive(Debug, Error)]
pub enum AuthError {
    // Registration / login errors
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Authentication errors
    #[error("Access token required")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,

    // Authorization errors
    /// Principal absent, or its role is not in the allowed set
    #[error("Forbidden: role {actual:?} not in {allowed:?}")]
    Forbidden {
        allowed: Vec<Role>,
        actual: Option<Role>,
    },

    // Internal errors, never described to the client
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Password hashing error: {0}")]
    PasswordHashError(String),
    #[error("Token generation error: {0}")]
    TokenGenerationError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden: You do not have access to this resource";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AuthError::DuplicateUsername;
            }
        }
        AuthError::DatabaseError(err.to_string())
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateUsername | AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken | AuthError::ExpiredToken => StatusCode::FORBIDDEN,
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to clients
    pub fn error_message(&self) -> &'static str {
        match self {
            AuthError::DuplicateUsername => "Username already exists",
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::MissingToken => "Access token required",
            AuthError::InvalidToken | AuthError::ExpiredToken => INVALID_TOKEN_MESSAGE,
            AuthError::Forbidden { .. } => FORBIDDEN_MESSAGE,
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::DuplicateUsername | AuthError::InvalidCredentials => {
                debug!("{}", self);
            }
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                warn!("Rejected credential: {}", self);
            }
            AuthError::Forbidden { allowed, actual } => {
                warn!("Authorization failed: allowed={:?}, actual={:?}", allowed, actual);
            }
            _ => {
                error!("{}", self);
            }
        }

        let body = Json(json!({
            "error": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_and_invalid_tokens_are_indistinguishable() {
        assert_eq!(AuthError::ExpiredToken.status_code(), AuthError::InvalidToken.status_code());
        assert_eq!(AuthError::ExpiredToken.error_message(), AuthError::InvalidToken.error_message());
    }

    #[test]
    fn test_three_way_rejection_distinction() {
        let forbidden = AuthError::Forbidden {
            allowed: vec![Role::Ghost],
            actual: Some(Role::Human),
        };

        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_ne!(forbidden.error_message(), AuthError::InvalidToken.error_message());
    }

    #[test]
    fn test_internal_errors_do_not_leak_detail() {
        let err = AuthError::DatabaseError("connection refused to 10.0.0.3".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_message(), INTERNAL_ERROR_MESSAGE);
    }
}
