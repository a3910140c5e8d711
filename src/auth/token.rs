// JWT token issuance and validation service

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::auth::{
    error::AuthError,
    models::{AuthenticatedPrincipal, Role},
};

/// Access tokens are valid for exactly one hour after issuance
pub const ACCESS_TOKEN_TTL_SECS: i64 = 3600;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub role: Role,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

/// Token service for JWT operations
///
/// Built once from the process-wide signing secret and shared read-only. If the
/// secret changes between restarts, every outstanding token stops verifying.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue an access token for `(username, role)` valid for one hour
    pub fn issue(&self, username: &str, role: Role) -> Result<String, AuthError> {
        self.issue_at(username, role, Utc::now().timestamp())
    }

    /// Issue a token as if it had been minted at `issued_at` (unix seconds)
    pub fn issue_at(&self, username: &str, role: Role, issued_at: i64) -> Result<String, AuthError> {
        let claims = Claims {
            username: username.to_string(),
            role,
            iat: issued_at,
            exp: issued_at + ACCESS_TOKEN_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Decode and check a token, returning its claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })?;

        // jsonwebtoken accepts a token whose exp equals now; the window is half-open
        if Utc::now().timestamp() >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }

    /// Validate a presented token and derive the request principal from it
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedPrincipal, AuthError> {
        let claims = self.validate(token)?;
        Ok(AuthenticatedPrincipal {
            username: claims.username,
            role: claims.role,
        })
    }
}
