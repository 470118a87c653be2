pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::Deserialize;

// Re-export necessary items
pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password, CredentialError};
pub use token::{AuthError, Claims, TokenService, TOKEN_TTL_SECS};

/// Represents the payload for a new user registration request.
///
/// Fields default to empty when absent so the handler can answer missing and
/// blank input the same way, with a 400.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    /// Desired login name. Stored lowercased; uniqueness is case-insensitive.
    #[serde(default)]
    pub username: String,
    /// Password for the new account.
    #[serde(default)]
    pub password: String,
}

/// Represents the payload for a login request.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
