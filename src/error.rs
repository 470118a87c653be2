//!
//! # Error Handling
//!
//! This module defines `AppError`, the error type every request handler
//! returns. Repositories and auth services report failures through their own
//! tagged enums (`RepoError`, `CredentialError`, `AuthError`); the `From`
//! implementations here translate those tags into HTTP statuses and the JSON
//! envelopes the API speaks:
//!
//! - client-facing failures serialize as `{status, message}`;
//! - storage-layer failures serialize as `{status, dbError, message, error}`,
//!   where `dbError` carries the storage engine's own error code (for
//!   Postgres, the SQLSTATE such as `23505`).

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::password::CredentialError;
use crate::auth::token::AuthError;
use crate::store::RepoError;

/// Represents all failure modes a handler can surface to a client.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or incomplete request input (HTTP 400).
    BadRequest(String),
    /// Authentication failures: missing, invalid, or expired credentials,
    /// or a caller acting for a user that cannot be resolved (HTTP 403).
    Forbidden(String),
    /// A requested user or task does not exist (HTTP 404).
    NotFound(String),
    /// Input that parsed but failed field validation (HTTP 422).
    ValidationError(String),
    /// An unexpected server-side failure outside the storage layer (HTTP 500).
    InternalServerError(String),
    /// A fault reported by the storage layer, duplicate-key rejections
    /// included (HTTP 500, storage envelope).
    StorageError {
        /// Engine-specific error code, when the engine reported one.
        code: Option<String>,
        /// Error class name placed in the envelope's `error` field.
        error: String,
        message: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::StorageError { message, .. } => write!(f, "Storage Error: {}", message),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation lets Actix Web translate `AppError` results from
/// handlers into the correct HTTP status codes and JSON envelopes.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "status": 400,
                "message": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "status": 403,
                "message": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "status": 404,
                "message": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "status": 422,
                "message": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "status": 500,
                "message": msg
            })),
            AppError::StorageError {
                code,
                error,
                message,
            } => HttpResponse::InternalServerError().json(json!({
                "status": 500,
                "dbError": code,
                "message": message,
                "error": error
            })),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed per-field messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<CredentialError> for AppError {
    fn from(error: CredentialError) -> AppError {
        match error {
            CredentialError::EmptySecret => AppError::BadRequest("Password cannot be empty".into()),
            CredentialError::Hash(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

/// Token failures are authentication failures from the client's point of
/// view, except a signing fault on issuance, which is ours.
impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::Signing(msg) => AppError::InternalServerError(msg),
            other => AppError::Forbidden(other.to_string()),
        }
    }
}

/// Maps repository tags onto statuses: missing rows are 404, rejected input
/// is 422, and everything the storage layer itself refused is surfaced as a
/// 500 storage envelope.
impl From<RepoError> for AppError {
    fn from(error: RepoError) -> AppError {
        match error {
            RepoError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            RepoError::Validation(msg) => AppError::ValidationError(msg),
            RepoError::DuplicateKey { code, detail } => AppError::StorageError {
                code,
                error: "DuplicateKeyError".into(),
                message: detail,
            },
            RepoError::Storage { code, message } => AppError::StorageError {
                code,
                error: "StorageError".into(),
                message,
            },
        }
    }
}
