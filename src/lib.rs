pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod ghost;
pub mod validation;

use axum::{
    extract::FromRef,
    http::{header, HeaderValue},
    middleware,
    routing::post,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, Role},
    password::PasswordService,
    repository::UserRepository,
    service::AuthService,
    token::TokenService,
};
use ghost::models::{BoundingBox, DetectRequest, GhostDetection};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        ghost::handlers::detect_ghost,
    ),
    components(
        schemas(RegisterRequest, LoginRequest, LoginResponse, MessageResponse, Role, DetectRequest, GhostDetection, BoundingBox)
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "ghosts", description = "Role-gated detection endpoints")
    ),
    info(
        title = "Ghost Detector API",
        version = "1.0.0",
        description = "Token-authenticated API for humans and ghosts"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(
        access_token_secret: &str,
        user_repo: Arc<dyn UserRepository>,
        password_service: PasswordService,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(access_token_secret));
        let auth_service = Arc::new(AuthService::new(
            user_repo,
            password_service,
            Arc::clone(&token_service),
        ));

        Self {
            auth_service,
            token_service,
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.token_service)
    }
}

/// Creates and configures the application router
///
/// Public routes: registration, login and the API docs. Everything from
/// `ghost::routes()` runs behind `authenticate` and then its role guard.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = ghost::routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::middleware::authenticate,
    ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .merge(protected)
        .fallback(error::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(error::handle_panic))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                ))
                .layer(cors),
        )
        .with_state(state)
}
