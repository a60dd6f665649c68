//! Repository layer - data access built on the document gateway.

mod auth_repository;
mod gateway;
mod user_repository;

pub use auth_repository::{AuthRepository, AuthStore, RepoKeyResolver};
pub use gateway::TableGateway;
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use auth_repository::MockAuthRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
