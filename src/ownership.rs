//!
//! # Ownership Coordination
//!
//! A user's `task_refs` list mirrors the tasks whose `owner_id` points back
//! at them. Creating or deleting a task therefore touches two records, and
//! the two writes are not wrapped in a shared transaction: the task write is
//! the primary commit, the reference write follows. A crash between them
//! leaves a reference list that is stale in one direction, which a retry of
//! the surrounding operation reconciles because both reference mutations are
//! idempotent.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Task, TaskInput};
use crate::store::{RepoError, TaskStore, UserStore};

/// Orchestrates the cross-entity effects of task creation and deletion.
#[derive(Clone)]
pub struct OwnershipCoordinator {
    users: Arc<dyn UserStore>,
    tasks: Arc<dyn TaskStore>,
}

impl OwnershipCoordinator {
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self { users, tasks }
    }

    /// Creates a task and appends its id to the owner's reference list.
    ///
    /// The owner must resolve before anything is written; a caller holding a
    /// token for a user that no longer exists gets `RepoError::NotFound`.
    /// The reference append is best-effort: once the task row exists it is
    /// returned even if the append fails, and the inconsistency is logged
    /// for reconciliation.
    pub async fn create_owned(&self, input: TaskInput, owner_id: Uuid) -> Result<Task, RepoError> {
        let owner = self
            .users
            .find_by_id(owner_id)
            .await?
            .ok_or_else(|| RepoError::NotFound("User".into()))?;

        let task = self.tasks.create_task(input, owner.id).await?;

        if let Err(err) = self.users.add_task_ref(owner.id, task.id).await {
            log::warn!(
                "task {} created but reference update for owner {} failed: {}",
                task.id,
                owner.id,
                err
            );
        }

        Ok(task)
    }

    /// Deletes the task behind `slug`, then drops its id from the owner's
    /// reference list.
    ///
    /// The delete is the primary commit. An owner that cannot be found
    /// afterwards is a data-integrity fault: logged, never a failed delete.
    pub async fn delete_owned(&self, slug: &str) -> Result<Task, RepoError> {
        let task = self.tasks.delete_task(slug).await?;

        if let Err(err) = self.users.remove_task_ref(task.owner_id, task.id).await {
            log::warn!(
                "task {} deleted but reference update for owner {} failed: {}",
                task.id,
                task.owner_id,
                err
            );
        }

        Ok(task)
    }
}
