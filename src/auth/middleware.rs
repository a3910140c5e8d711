// Authentication and authorization middleware for protected routes
//
// Protected requests pass through two stages in order: `authenticate` turns
// the bearer token into an `AuthenticatedPrincipal` stored in the request
// extensions, then `RequireRole` checks that principal against the roles the
// route admits. Either stage short-circuits with an `AuthError`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{
    error::AuthError,
    models::{AuthenticatedPrincipal, Role},
    token::TokenService,
};

/// Pull the bearer token out of the Authorization header
///
/// The header is split on single spaces and the second segment is the token.
/// A missing header, or a bare scheme with no second segment, counts as no
/// credential at all. An empty second segment (`Bearer ` or `Bearer  <token>`)
/// or any other scheme is a credential we cannot accept.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let mut segments = value.split(' ');
    let scheme = segments.next().unwrap_or_default();
    let token = segments.next().ok_or(AuthError::MissingToken)?;

    if !scheme.eq_ignore_ascii_case("Bearer") || token.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok(token)
}

/// Authenticate the request headers against the token service
pub fn authenticate_headers(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<AuthenticatedPrincipal, AuthError> {
    let token = bearer_token(headers)?;
    tokens.authenticate(token)
}

/// Decide whether `principal` may reach a route admitting `allowed`
///
/// An absent principal is always rejected: this stage must never run ahead of
/// authentication.
pub fn authorize(
    principal: Option<&AuthenticatedPrincipal>,
    allowed: &[Role],
) -> Result<(), AuthError> {
    match principal {
        Some(p) if allowed.contains(&p.role) => Ok(()),
        _ => Err(AuthError::Forbidden {
            allowed: allowed.to_vec(),
            actual: principal.map(|p| p.role),
        }),
    }
}

/// Authentication middleware: validates the bearer token and attaches the
/// resulting principal to the request
pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let principal = authenticate_headers(request.headers(), &tokens).map_err(|e| {
        debug!("Authentication failed for endpoint {}: {}", endpoint, e);
        e
    })?;

    debug!(
        "Authenticated username={}, role={}, endpoint={}",
        principal.username, principal.role, endpoint
    );
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Authorization middleware that admits a fixed set of roles
#[derive(Debug, Clone)]
pub struct RequireRole {
    allowed: &'static [Role],
}

impl RequireRole {
    pub fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    pub fn human() -> Self {
        Self::new(&[Role::Human])
    }

    pub fn ghost() -> Self {
        Self::new(&[Role::Ghost])
    }

    pub fn any() -> Self {
        Self::new(&[Role::Human, Role::Ghost])
    }

    pub fn allowed(&self) -> &'static [Role] {
        self.allowed
    }

    /// Middleware function that validates role-based access
    pub async fn middleware(self, request: Request, next: Next) -> Result<Response, AuthError> {
        let principal = request.extensions().get::<AuthenticatedPrincipal>();
        authorize(principal, self.allowed)?;

        debug!(
            "Authorization successful: endpoint={}, allowed={:?}",
            request.uri().path(),
            self.allowed
        );
        Ok(next.run(request).await)
    }
}

/// Handlers behind the middleware chain take the principal as an extractor
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .ok_or(AuthError::Forbidden {
                allowed: Vec::new(),
                actual: None,
            })
    }
}
