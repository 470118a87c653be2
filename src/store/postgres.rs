use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::{RepoError, TaskStore, UserStore};
use crate::models::{Task, TaskInput, TaskPatch, User};

/// SQLSTATE for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres-backed store used in production.
///
/// Uniqueness of usernames and slugs rests on the schema's UNIQUE
/// constraints; a race between two concurrent inserts is resolved by the
/// engine rejecting the second, surfaced here as `RepoError::DuplicateKey`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database and applies any pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, RepoError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| RepoError::Storage {
                code: None,
                message: e.to_string(),
            })?;
        Ok(Self::new(pool))
    }
}

/// Maps driver errors onto the repository taxonomy, pulling the SQLSTATE
/// out of engine-reported faults.
impl From<sqlx::Error> for RepoError {
    fn from(error: sqlx::Error) -> RepoError {
        match &error {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                if code.as_deref() == Some(UNIQUE_VIOLATION) {
                    RepoError::DuplicateKey {
                        code,
                        detail: db_err.message().to_string(),
                    }
                } else {
                    log::error!(
                        "database fault (SQLSTATE {}): {}",
                        code.as_deref().unwrap_or("unknown"),
                        db_err.message()
                    );
                    RepoError::Storage {
                        code,
                        message: db_err.message().to_string(),
                    }
                }
            }
            _ => {
                log::error!("storage fault: {}", error);
                RepoError::Storage {
                    code: None,
                    message: error.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, RepoError> {
        let user = User::new(username.to_lowercase(), password_hash.to_string());

        let saved = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_hash, created_on, task_refs)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, username, password_hash, created_on, task_refs",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_on)
        .bind(&user.task_refs)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_on, task_refs
             FROM users WHERE username = $1",
        )
        .bind(username.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_on, task_refs
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn add_task_ref(&self, user_id: Uuid, task_id: Uuid) -> Result<(), RepoError> {
        // The CASE keeps the append idempotent under retries
        let result = sqlx::query(
            "UPDATE users
             SET task_refs = CASE
                 WHEN task_refs @> ARRAY[$2]::uuid[] THEN task_refs
                 ELSE task_refs || $2
             END
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(task_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound("User".into()));
        }
        Ok(())
    }

    async fn remove_task_ref(&self, user_id: Uuid, task_id: Uuid) -> Result<(), RepoError> {
        // array_remove is a no-op when the id is absent
        let result =
            sqlx::query("UPDATE users SET task_refs = array_remove(task_refs, $2) WHERE id = $1")
                .bind(user_id)
                .bind(task_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound("User".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, input: TaskInput, owner_id: Uuid) -> Result<Task, RepoError> {
        input
            .validate()
            .map_err(|e| RepoError::Validation(e.to_string()))?;

        let task = Task::new(input, owner_id);

        let saved = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, title, content, slug, created_on, updated_on, is_completed, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, title, content, slug, created_on, updated_on, is_completed, owner_id",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.content)
        .bind(&task.slug)
        .bind(task.created_on)
        .bind(task.updated_on)
        .bind(task.is_completed)
        .bind(task.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Task>, RepoError> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, title, content, slug, created_on, updated_on, is_completed, owner_id
             FROM tasks WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, RepoError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, title, content, slug, created_on, updated_on, is_completed, owner_id
             FROM tasks WHERE owner_id = $1
             ORDER BY created_on, id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn update_task(&self, slug: &str, patch: TaskPatch) -> Result<Task, RepoError> {
        let updated = sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET title = COALESCE($2, title),
                 content = COALESCE($3, content),
                 is_completed = COALESCE($4, is_completed),
                 updated_on = $5
             WHERE slug = $1
             RETURNING id, title, content, slug, created_on, updated_on, is_completed, owner_id",
        )
        .bind(slug)
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.is_completed)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| RepoError::NotFound("Task".into()))
    }

    async fn delete_task(&self, slug: &str) -> Result<Task, RepoError> {
        let deleted = sqlx::query_as::<_, Task>(
            "DELETE FROM tasks WHERE slug = $1
             RETURNING id, title, content, slug, created_on, updated_on, is_completed, owner_id",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        deleted.ok_or_else(|| RepoError::NotFound("Task".into()))
    }
}
