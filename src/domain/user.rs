//! User domain entity and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::CommonModel;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-generated identifier
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user; the display name starts empty until set by the
    /// (out-of-band) profile flow.
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: String::new(),
            email: email.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CommonModel for User {
    fn set_created_time(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// User response (safe to return to clients)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: String,
    /// User display name
    pub name: String,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
