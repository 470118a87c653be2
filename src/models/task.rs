use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Input structure for creating a task.
/// Contains validation rules for its fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. At least 6 characters.
    #[validate(length(min = 6))]
    pub title: String,

    /// The body text of the task. At least 6 characters.
    #[validate(length(min = 6))]
    pub content: String,
}

/// Partial update for a task. Only these three fields are mutable; the slug
/// and owner are fixed at creation.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[validate(length(min = 6))]
    pub title: Option<String>,

    #[validate(length(min = 6))]
    pub content: Option<String>,

    pub is_completed: Option<bool>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// The body text of the task.
    pub content: String,
    /// URL-safe identifier, derived from the title and id at creation.
    pub slug: String,
    /// Timestamp of when the task was created.
    pub created_on: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_on: DateTime<Utc>,
    /// Whether the task has been marked done.
    pub is_completed: bool,
    /// Identifier of the user who owns the task.
    pub owner_id: Uuid,
}

/// Derives the task's slug: the title lowercased with each whitespace run
/// collapsed to a hyphen, followed by the last eight hex characters of the
/// id. The suffix keeps slugs unique across identical titles.
pub fn derive_slug(title: &str, id: Uuid) -> String {
    let hyphenated = WHITESPACE_RUN.replace_all(title, "-").to_lowercase();
    let hex = id.simple().to_string();
    format!("{}-{}", hyphenated, &hex[hex.len() - 8..])
}

impl Task {
    /// Creates a new `Task` instance from `TaskInput` and the owner's id.
    /// Assigns a fresh UUID, derives the slug, and stamps both timestamps
    /// with the current time.
    pub fn new(input: TaskInput, owner_id: Uuid) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Self {
            id,
            slug: derive_slug(&input.title, id),
            title: input.title,
            content: input.content,
            created_on: now,
            updated_on: now,
            is_completed: false,
            owner_id,
        }
    }

    /// Applies a patch in place, refreshing `updated_on`. Fields absent from
    /// the patch keep their current values.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        self.updated_on = Utc::now();
    }
}
