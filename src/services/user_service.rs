//! User service - user lookup and listing use cases.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::User;
use crate::errors::{AppResult, OptionExt};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user (called during registration)
    async fn create_user(&self, email: &str) -> AppResult<User>;

    /// Get a user by id
    async fn get_user(&self, id: &str) -> AppResult<User>;

    /// Page through users created strictly before `before`, newest first
    async fn list_users(
        &self,
        before: DateTime<Utc>,
        page_size: usize,
        filters: HashMap<String, Vec<String>>,
    ) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, email: &str) -> AppResult<User> {
        self.users.create(email).await
    }

    async fn get_user(&self, id: &str) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(
        &self,
        before: DateTime<Utc>,
        page_size: usize,
        filters: HashMap<String, Vec<String>>,
    ) -> AppResult<Vec<User>> {
        self.users.list_page(before, page_size, filters).await
    }
}
