//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::PasswordHasher;
use crate::infra::{AuthRepository, AuthStore, Datastore, LogMailer, UserStore};
use crate::services::{AuthService, Authenticator, TokenAuthority, UserManager, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Credential store (also the token middleware's key source)
    pub auth_repo: Arc<dyn AuthRepository>,
    /// Token authority
    pub token_authority: Arc<TokenAuthority>,
}

impl AppState {
    /// Wire the full service graph on top of a datastore.
    pub fn from_store(store: Arc<dyn Datastore>, config: &Config) -> Self {
        let auth_repo: Arc<dyn AuthRepository> = Arc::new(AuthStore::new(store.clone()));
        let user_service: Arc<dyn UserService> =
            Arc::new(UserManager::new(Arc::new(UserStore::new(store))));
        let token_authority = Arc::new(TokenAuthority::new(
            config.default_token_minutes,
            config.reset_token_minutes,
        ));
        let hasher = PasswordHasher::new(config.salt_size_bytes, config.global_salt());

        let auth_service: Arc<dyn AuthService> = Arc::new(Authenticator::new(
            auth_repo.clone(),
            user_service.clone(),
            token_authority.clone(),
            hasher,
            Arc::new(LogMailer),
        ));

        Self {
            auth_service,
            user_service,
            auth_repo,
            token_authority,
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        auth_repo: Arc<dyn AuthRepository>,
        token_authority: Arc<TokenAuthority>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            auth_repo,
            token_authority,
        }
    }
}
