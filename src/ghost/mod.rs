// Ghost detection module
// Mocked detection and lookup endpoints, grouped by the roles they admit

pub mod handlers;
pub mod models;

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};

use crate::auth::middleware::RequireRole;
use crate::AppState;

/// Gate every route in `router` behind `guard`
fn guarded(router: Router<AppState>, guard: RequireRole) -> Router<AppState> {
    router.route_layer(middleware::from_fn(move |request: Request, next: Next| {
        let guard = guard.clone();
        async move { guard.middleware(request, next).await }
    }))
}

/// Routes that need an authenticated principal. The caller is responsible for
/// layering authentication around the returned router.
pub fn routes() -> Router<AppState> {
    let human = Router::new()
        .route("/detect", post(handlers::detect_ghost))
        .route("/sightings", get(handlers::sightings))
        .route("/ghost-info", get(handlers::ghost_info))
        .route("/users", get(handlers::list_hunters))
        .route("/spirit-guide", post(handlers::spirit_guide));

    let ghost = Router::new()
        .route("/ghost/detect", post(handlers::detect_human))
        .route("/ghost/spooky-name", get(handlers::spooky_name))
        .route("/ghost/favorite-haunts", get(handlers::favorite_haunts));

    let either = Router::new().route("/spook-level", get(handlers::spook_level));

    Router::new()
        .merge(guarded(human, RequireRole::human()))
        .merge(guarded(ghost, RequireRole::ghost()))
        .merge(guarded(either, RequireRole::any()))
}
