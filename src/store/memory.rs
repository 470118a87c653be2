use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use super::{RepoError, TaskStore, UserStore};
use crate::models::{Task, TaskInput, TaskPatch, User};

/// Error code reported by this store for uniqueness violations, standing in
/// for the SQLSTATE a database engine would produce.
const DUPLICATE_KEY_CODE: &str = "duplicate_key";

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    username_index: HashMap<String, Uuid>,
    tasks: HashMap<Uuid, Task>,
    slug_index: HashMap<String, Uuid>,
}

/// In-memory store behind a single `RwLock`.
///
/// Backs the test suite and local runs without a database. Lookups take the
/// read lock; every mutation takes the write lock, which also makes the
/// uniqueness checks race-free within one process.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, RepoError> {
        let username = username.to_lowercase();
        let mut inner = self.inner.write().await;

        if inner.username_index.contains_key(&username) {
            return Err(RepoError::DuplicateKey {
                code: Some(DUPLICATE_KEY_CODE.into()),
                detail: format!("username '{}' already exists", username),
            });
        }

        let user = User::new(username.clone(), password_hash.to_string());
        inner.username_index.insert(username, user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let username = username.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .username_index
            .get(&username)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn add_task_ref(&self, user_id: Uuid, task_id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| RepoError::NotFound("User".into()))?;
        if !user.task_refs.contains(&task_id) {
            user.task_refs.push(task_id);
        }
        Ok(())
    }

    async fn remove_task_ref(&self, user_id: Uuid, task_id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| RepoError::NotFound("User".into()))?;
        user.task_refs.retain(|id| *id != task_id);
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, input: TaskInput, owner_id: Uuid) -> Result<Task, RepoError> {
        input
            .validate()
            .map_err(|e| RepoError::Validation(e.to_string()))?;

        let mut inner = self.inner.write().await;
        let task = Task::new(input, owner_id);

        if inner.slug_index.contains_key(&task.slug) {
            return Err(RepoError::DuplicateKey {
                code: Some(DUPLICATE_KEY_CODE.into()),
                detail: format!("slug '{}' already exists", task.slug),
            });
        }

        inner.slug_index.insert(task.slug.clone(), task.id);
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Task>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .slug_index
            .get(slug)
            .and_then(|id| inner.tasks.get(id))
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, RepoError> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|task| task.owner_id == owner_id)
            .cloned()
            .collect();
        // Same ordering the Postgres listing index yields
        tasks.sort_by(|a, b| (a.created_on, a.id).cmp(&(b.created_on, b.id)));
        Ok(tasks)
    }

    async fn update_task(&self, slug: &str, patch: TaskPatch) -> Result<Task, RepoError> {
        let mut inner = self.inner.write().await;
        let id = *inner
            .slug_index
            .get(slug)
            .ok_or_else(|| RepoError::NotFound("Task".into()))?;
        let task = inner
            .tasks
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound("Task".into()))?;
        task.apply_patch(patch);
        Ok(task.clone())
    }

    async fn delete_task(&self, slug: &str) -> Result<Task, RepoError> {
        let mut inner = self.inner.write().await;
        let id = inner
            .slug_index
            .remove(slug)
            .ok_or_else(|| RepoError::NotFound("Task".into()))?;
        let task = inner
            .tasks
            .remove(&id)
            .ok_or_else(|| RepoError::NotFound("Task".into()))?;
        Ok(task)
    }
}
