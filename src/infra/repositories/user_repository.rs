//! User persistence on top of the document gateway.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::gateway::TableGateway;
use crate::config::COLLECTION_USERS;
use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::infra::store::Datastore;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user and return it with its generated id.
    async fn create(&self, email: &str) -> AppResult<User>;

    /// Find a user by id; `Ok(None)` when absent.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// Page through users created strictly before `before`, newest first,
    /// restricted by the field filters.
    async fn list_page(
        &self,
        before: DateTime<Utc>,
        page_size: usize,
        filters: HashMap<String, Vec<String>>,
    ) -> AppResult<Vec<User>>;
}

/// Concrete user repository over the document gateway.
pub struct UserStore {
    users: TableGateway,
}

impl UserStore {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self {
            users: TableGateway::new(store, COLLECTION_USERS),
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, email: &str) -> AppResult<User> {
        let mut user = User::new(email);
        let id = self.users.create(&mut user).await?;
        user.id = id;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        match self.users.get::<User>(id).await {
            Ok(user) => Ok(Some(user)),
            Err(AppError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_page(
        &self,
        before: DateTime<Utc>,
        page_size: usize,
        filters: HashMap<String, Vec<String>>,
    ) -> AppResult<Vec<User>> {
        self.users.get_page(before, page_size, &filters).await
    }
}
