// Authentication module
// Bearer-token authentication, role authorization, registration and login

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, register_handler};
pub use middleware::{authenticate, authorize, RequireRole};
pub use models::{AuthenticatedPrincipal, LoginRequest, LoginResponse, RegisterRequest, Role, User};
pub use repository::{InMemoryUserRepository, PgUserRepository, UserRepository};
pub use service::AuthService;
pub use token::TokenService;
