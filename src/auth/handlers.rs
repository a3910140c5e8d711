// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, Role};
use crate::error::ApiError;
use crate::validation::ValidJson;
use crate::AppState;

/// Register a new user
/// POST /register
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Validation failed or username taken", body = String, example = json!({"error": "Username already exists"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal Server Error"}))
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    // Already checked by validation, parsed here into the closed enum
    let role = request
        .role
        .parse::<Role>()
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    state
        .auth_service
        .register(&request.username, &request.password, role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Login a user
/// POST /login
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Validation failed or invalid credentials", body = String, example = json!({"error": "Invalid credentials"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal Server Error"}))
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state
        .auth_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse { token }))
}
