//! Credential store: auth records and revocable signing keys.

use std::sync::Arc;

use async_trait::async_trait;

use super::gateway::TableGateway;
use crate::config::{COLLECTION_AUTH, COLLECTION_SIGNING_KEYS};
use crate::domain::{AuthRecord, SigningKeyRecord};
use crate::errors::AppResult;
use crate::infra::store::Datastore;
use crate::services::token_service::SigningKeyResolver;

/// Secondary index used for credential lookup.
const EMAIL_INDEX: &str = "email";

/// Credential store trait for dependency injection.
///
/// Owns the lifecycle of [`AuthRecord`] and [`SigningKeyRecord`]; nothing
/// else writes those collections.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Create the credential record for a user.
    async fn create_auth(
        &self,
        uid: &str,
        email: &str,
        hashed_pass: &str,
        salt: &str,
    ) -> AppResult<String>;

    /// Look a credential record up by email.
    ///
    /// Zero matches is `Ok(None)`, not an error; callers distinguish
    /// "lookup succeeded, nothing there" from "lookup failed".
    async fn get_by_email(&self, email: &str) -> AppResult<Option<AuthRecord>>;

    /// Store the signing key for `(uid, audience)`, replacing any prior
    /// key. Replacement is the revocation mechanism: every token signed
    /// with the old key dies the moment this returns.
    async fn save_signed_key(&self, uid: &str, audience: &str, key: &str) -> AppResult<()>;

    /// Fetch the current signing key for `(uid, audience)`.
    async fn get_signing_key(&self, uid: &str, audience: &str) -> AppResult<String>;
}

/// Concrete credential store over the document gateway.
pub struct AuthStore {
    auth: TableGateway,
    keys: TableGateway,
}

impl AuthStore {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self {
            auth: TableGateway::new(store.clone(), COLLECTION_AUTH),
            keys: TableGateway::new(store, COLLECTION_SIGNING_KEYS),
        }
    }
}

#[async_trait]
impl AuthRepository for AuthStore {
    async fn create_auth(
        &self,
        uid: &str,
        email: &str,
        hashed_pass: &str,
        salt: &str,
    ) -> AppResult<String> {
        let mut record = AuthRecord::new(uid, email, hashed_pass, salt);
        self.auth.create(&mut record).await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<AuthRecord>> {
        let records: Vec<AuthRecord> = self.auth.get_list(EMAIL_INDEX, email).await?;
        Ok(records.into_iter().next())
    }

    async fn save_signed_key(&self, uid: &str, audience: &str, key: &str) -> AppResult<()> {
        // Upsert at the composite key; last writer wins, which is enough
        // since revocation only needs *a* key to be current.
        let id = SigningKeyRecord::record_id(uid, audience);
        let mut record = SigningKeyRecord::new(uid, audience, key);
        self.keys.update(&mut record, &id).await
    }

    async fn get_signing_key(&self, uid: &str, audience: &str) -> AppResult<String> {
        let record: SigningKeyRecord = self
            .keys
            .get(&SigningKeyRecord::record_id(uid, audience))
            .await?;
        Ok(record.key)
    }
}

/// Adapter exposing the credential store as the token authority's key
/// resolver, so validation always sees the key currently on record.
pub struct RepoKeyResolver(pub Arc<dyn AuthRepository>);

#[async_trait]
impl SigningKeyResolver for RepoKeyResolver {
    async fn signing_key(&self, uid: &str, audience: &str) -> AppResult<String> {
        self.0.get_signing_key(uid, audience).await
    }
}
