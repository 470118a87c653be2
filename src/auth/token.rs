use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UserSnapshot;

/// Seconds an issued token stays valid.
pub const TOKEN_TTL_SECS: i64 = 1800;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Malformed token: {0}")]
    Malformed(String),
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Represents the claims encoded within an issued token.
///
/// The full user snapshot rides inside the token, so protected handlers can
/// identify the caller without a storage lookup. There is no revocation
/// list; a token stays valid until `exp`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Snapshot of the user at issuance time.
    pub user: UserSnapshot,
    /// Issuance timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies the signed identity tokens handed out at login.
///
/// The signing secret is injected once at construction from configuration;
/// nothing here reads the process environment at call time.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Produces a signed token embedding the given snapshot, valid for
    /// [`TOKEN_TTL_SECS`] from now.
    pub fn issue(&self, user: UserSnapshot) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            user,
            iat: now as usize,
            exp: (now + TOKEN_TTL_SECS) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Checks signature and expiry, returning the embedded snapshot.
    pub fn verify(&self, token: &str) -> Result<UserSnapshot, AuthError> {
        let mut validation = Validation::default();
        // Expiry is exact, no clock leeway
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.user)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed(e.to_string()),
            })
    }
}
