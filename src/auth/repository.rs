// User credential storage

use axum::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::{hash_map::Entry, HashMap};
use tokio::sync::RwLock;

use crate::auth::{
    error::AuthError,
    models::{Role, User},
};

/// Persistence for registered users
///
/// `create_user` must be an atomic check-then-insert: when two callers race
/// to register the same username, exactly one of them gets
/// `AuthError::DuplicateUsername`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by username (case-sensitive)
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

    /// Check if a username is taken
    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// Create a new user
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AuthError>;
}

/// Postgres-backed repository; uniqueness comes from the UNIQUE constraint on
/// `users.username`.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        // A unique violation converts to DuplicateUsername via From<sqlx::Error>
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}

#[derive(Default)]
struct InMemoryUsers {
    by_username: HashMap<String, User>,
    next_id: i32,
}

/// Process-local repository used when no database is configured, and in tests
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<InMemoryUsers>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.read().await.by_username.get(username).cloned())
    }

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let mut guard = self.users.write().await;
        let users = &mut *guard;

        match users.by_username.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AuthError::DuplicateUsername),
            Entry::Vacant(slot) => {
                users.next_id += 1;
                let user = User {
                    id: users.next_id,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                    role,
                    created_at: Utc::now(),
                };
                Ok(slot.insert(user).clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_then_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create_user("alice", "hash", Role::Human).await.unwrap();

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, Role::Human);
        assert_eq!(found.password_hash, "hash");
        assert!(repo.username_exists("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create_user("alice", "hash", Role::Human).await.unwrap();

        assert!(repo.find_by_username("Alice").await.unwrap().is_none());
        assert!(repo.create_user("Alice", "hash", Role::Ghost).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create_user("alice", "hash", Role::Human).await.unwrap();

        let result = repo.create_user("alice", "other", Role::Ghost).await;
        assert!(matches!(result, Err(AuthError::DuplicateUsername)));

        // The original record is untouched
        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.role, Role::Human);
    }

    #[tokio::test]
    async fn test_rejected_duplicate_does_not_consume_an_id() {
        let repo = InMemoryUserRepository::new();
        let alice = repo.create_user("alice", "hash", Role::Human).await.unwrap();

        for _ in 0..3 {
            assert!(repo.create_user("alice", "hash", Role::Human).await.is_err());
        }

        let bob = repo.create_user("bob", "hash", Role::Ghost).await.unwrap();
        assert_eq!(bob.id, alice.id + 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_admit_exactly_one() {
        let repo = Arc::new(InMemoryUserRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create_user("bob", "hash", Role::Ghost).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AuthError::DuplicateUsername) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(created, 1);
    }
}
