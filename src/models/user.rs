use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Represents a registered account as stored in the database.
///
/// The credential digest is never serialized into API responses or tokens;
/// callers that need a wire-safe view use [`UserSnapshot`].
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user (UUID v4).
    pub id: Uuid,
    /// Login name, normalized to lowercase before persistence.
    pub username: String,
    /// Credential digest produced by the credential store.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Timestamp of registration.
    pub created_on: DateTime<Utc>,
    /// Identifiers of the tasks this user owns, in creation order.
    pub task_refs: Vec<Uuid>,
}

/// The identity view embedded in tokens and returned by the login endpoint:
/// everything a caller may see about a user, nothing they may not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: Uuid,
    pub username: String,
    pub created_on: DateTime<Utc>,
    pub task_refs: Vec<Uuid>,
}

impl User {
    /// Creates a new `User` from a normalized username and a credential
    /// digest. Sets `created_on` to the current time and `id` to a new UUID;
    /// the task list starts empty.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_on: Utc::now(),
            task_refs: Vec::new(),
        }
    }
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_on: user.created_on,
            task_refs: user.task_refs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("alice".to_string(), "$2b$10$digest".to_string());
        assert_eq!(user.username, "alice");
        assert!(user.task_refs.is_empty());
    }

    #[test]
    fn test_snapshot_omits_credential_digest() {
        let user = User::new("alice".to_string(), "$2b$10$digest".to_string());
        let snapshot = UserSnapshot::from(&user);

        assert_eq!(snapshot.id, user.id);
        assert_eq!(snapshot.username, "alice");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdOn").is_some());
        assert!(json.get("taskRefs").is_some());
    }

    #[test]
    fn test_user_serialization_skips_hash() {
        let user = User::new("alice".to_string(), "$2b$10$digest".to_string());
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
