//!
//! # Persistence Layer
//!
//! Handlers and the ownership coordinator reach storage through the
//! [`UserStore`] and [`TaskStore`] traits. [`PgStore`] is the production
//! Postgres implementation; [`MemoryStore`] backs the test suite and local
//! runs without a database, enforcing the same uniqueness rules the schema
//! does. Expected failures come back as [`RepoError`] tags, never as raw
//! driver errors.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Task, TaskInput, TaskPatch, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Tagged failure conditions a repository can report.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A uniqueness constraint rejected the write. `code` carries the
    /// engine's identifier for the condition when it reported one.
    #[error("Duplicate key: {detail}")]
    DuplicateKey {
        code: Option<String>,
        detail: String,
    },
    #[error("{0} not found")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    /// Transport or engine fault outside the expected taxonomy.
    #[error("Storage failure: {message}")]
    Storage {
        code: Option<String>,
        message: String,
    },
}

/// Access to user records and their task-reference lists.
///
/// Usernames are normalized to lowercase on both write and lookup, so
/// uniqueness and login are case-insensitive.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user with an empty task list. A username already
    /// taken in any casing is a `DuplicateKey`.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Appends a task id to the user's reference list. Appending an id
    /// already present is a no-op.
    async fn add_task_ref(&self, user_id: Uuid, task_id: Uuid) -> Result<(), RepoError>;

    /// Removes a task id from the user's reference list. An absent id is a
    /// no-op, not an error; an unknown user is `NotFound`.
    async fn remove_task_ref(&self, user_id: Uuid, task_id: Uuid) -> Result<(), RepoError>;
}

/// Access to task records, addressed by slug.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Validates the input and persists a new task, deriving its slug from
    /// the title and the fresh id.
    async fn create_task(&self, input: TaskInput, owner_id: Uuid) -> Result<Task, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Task>, RepoError>;

    /// All tasks owned by the user, oldest first.
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, RepoError>;

    /// Applies the mutable fields of `patch` and refreshes `updated_on`.
    async fn update_task(&self, slug: &str, patch: TaskPatch) -> Result<Task, RepoError>;

    /// Removes the task, returning its final state for the response body
    /// and for the ownership cleanup that follows.
    async fn delete_task(&self, slug: &str) -> Result<Task, RepoError>;
}
