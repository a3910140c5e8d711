// Authentication service - business logic layer

use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{
    error::AuthError,
    models::{Role, User},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};

/// Authentication service coordinating registration and login
///
/// Both flows are single-shot: a failed attempt leaves nothing behind except
/// what the repository already committed.
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    password_service: Arc<PasswordService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        password_service: PasswordService,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_repo,
            password_service: Arc::new(password_service),
            token_service,
        }
    }

    /// Register a new user. Input shape has already been validated.
    pub async fn register(&self, username: &str, password: &str, role: Role) -> Result<User, AuthError> {
        if self.user_repo.username_exists(username).await? {
            return Err(AuthError::DuplicateUsername);
        }

        let passwords = Arc::clone(&self.password_service);
        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || passwords.hash_password(&plaintext))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))??;

        // The repository re-checks uniqueness atomically; a racing registration
        // that slipped past the check above surfaces here as DuplicateUsername
        let user = self.user_repo.create_user(username, &password_hash, role).await?;

        info!("Registered user '{}' with role {}", user.username, user.role);
        Ok(user)
    }

    /// Login a user, returning a freshly issued access token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self.user_repo.find_by_username(username).await?;

        let passwords = Arc::clone(&self.password_service);
        let candidate = password.to_string();
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let matched = tokio::task::spawn_blocking(move || {
            passwords.verify_or_dummy(&candidate, stored_hash.as_deref())
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = match user {
            Some(user) if matched => user,
            _ => {
                debug!("Login rejected for username '{}'", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.token_service.issue(&user.username, user.role)?;
        info!("User '{}' logged in", user.username);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{password::test_password_service, repository::InMemoryUserRepository};

    fn test_service() -> (AuthService, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new("service_test_secret"));
        let service = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            test_password_service(),
            Arc::clone(&tokens),
        );
        (service, tokens)
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (service, _) = test_service();
        let user = service.register("alice", "secret1", Role::Human).await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Human);
        assert_ne!(user.password_hash, "secret1");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_twice_is_duplicate() {
        let (service, _) = test_service();
        service.register("alice", "secret1", Role::Human).await.unwrap();

        let second = service.register("alice", "another1", Role::Ghost).await;
        assert!(matches!(second, Err(AuthError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_admit_at_most_one() {
        let (service, _) = test_service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.register("casper", "boo-boo", Role::Ghost).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AuthError::DuplicateUsername) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_login_issues_token_carrying_role() {
        let (service, tokens) = test_service();
        service.register("casper", "boo-boo", Role::Ghost).await.unwrap();

        let token = service.login("casper", "boo-boo").await.unwrap();
        let principal = tokens.authenticate(&token).unwrap();
        assert_eq!(principal.username, "casper");
        assert_eq!(principal.role, Role::Ghost);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = test_service();
        service.register("alice", "secret1", Role::Human).await.unwrap();

        let wrong_password = service.login("alice", "wrong-password").await.unwrap_err();
        let unknown_user = service.login("nobody", "secret1").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.status_code(), unknown_user.status_code());
        assert_eq!(wrong_password.error_message(), unknown_user.error_message());
    }

    #[tokio::test]
    async fn test_login_is_case_sensitive_on_username() {
        let (service, _) = test_service();
        service.register("alice", "secret1", Role::Human).await.unwrap();

        assert!(matches!(
            service.login("ALICE", "secret1").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
