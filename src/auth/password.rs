// Password hashing and verification service

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::warn;

use crate::auth::error::AuthError;

/// Password service for hashing and verification
///
/// Hashes are Argon2id PHC strings with a random per-password salt. A dummy
/// hash is computed up front so that a login for an unknown username costs the
/// same as a login with a wrong password.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordService {
    /// Create a PasswordService with explicit Argon2id cost parameters
    pub fn new(params: Params) -> Result<Self, AuthError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = Self::hash_with(&argon2, "dummy-password-for-timing")?;
        Ok(Self { argon2, dummy_hash })
    }

    /// Hash a password using Argon2id
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Self::hash_with(&self.argon2, password)
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is `false`, never an error. A stored hash that cannot be
    /// parsed is treated as a mismatch.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }

    /// Verify against `hash` when present, otherwise burn the same amount of
    /// work against the dummy hash and report a mismatch.
    pub fn verify_or_dummy(&self, password: &str, hash: Option<&str>) -> bool {
        match hash {
            Some(hash) => self.verify_password(password, hash),
            None => {
                let _ = self.verify_password(password, &self.dummy_hash);
                false
            }
        }
    }

    fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) fn test_password_service() -> PasswordService {
    // Minimal cost keeps the test suite fast; production uses Params::default()
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap();
    PasswordService::new(params).unwrap()
}
