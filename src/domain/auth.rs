//! Authentication records: per-user credentials and revocable signing keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::CommonModel;

/// One credential record per user, looked up by email.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthRecord {
    /// Store-generated identifier
    #[serde(default)]
    pub id: String,
    /// Owning user id (at most one record per uid)
    pub uid: String,
    pub email: String,
    pub hashed_pass: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Keep credential material out of debug output
impl std::fmt::Debug for AuthRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRecord")
            .field("id", &self.id)
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("hashed_pass", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl AuthRecord {
    pub fn new(
        uid: impl Into<String>,
        email: impl Into<String>,
        hashed_pass: impl Into<String>,
        salt: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            uid: uid.into(),
            email: email.into(),
            hashed_pass: hashed_pass.into(),
            salt: salt.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CommonModel for AuthRecord {
    fn set_created_time(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// The current signing key for one `(user, audience)` pair.
///
/// Writing a new record at the same composite key replaces the previous
/// one, which instantly invalidates every token signed with the old key.
#[derive(Clone, Serialize, Deserialize)]
pub struct SigningKeyRecord {
    #[serde(default)]
    pub id: String,
    pub uid: String,
    pub audience: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for SigningKeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyRecord")
            .field("id", &self.id)
            .field("uid", &self.uid)
            .field("audience", &self.audience)
            .field("key", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl SigningKeyRecord {
    pub fn new(
        uid: impl Into<String>,
        audience: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        let uid = uid.into();
        let audience = audience.into();
        let now = Utc::now();
        Self {
            id: Self::record_id(&uid, &audience),
            uid,
            audience,
            key: key.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Composite primary key; one active key per `(uid, audience)`.
    pub fn record_id(uid: &str, audience: &str) -> String {
        format!("{uid}:{audience}")
    }
}

impl CommonModel for SigningKeyRecord {
    fn set_created_time(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
