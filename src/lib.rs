//! The `taskhive` library crate.
//!
//! This crate contains the domain models, authentication services, storage
//! layer, ownership coordination, routing configuration, and error handling
//! for the TaskHive service. The main binary (`main.rs`) uses it to wire the
//! Postgres-backed application; the integration tests wire the same routes
//! over the in-memory store.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod ownership;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AppError;
pub use state::AppState;
