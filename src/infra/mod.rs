//! Infrastructure layer - External systems integration
//!
//! This module handles external system concerns:
//! - The document store boundary and its in-memory backend
//! - Repositories built on the generic gateway
//! - Outbound mail

pub mod mail;
pub mod repositories;
pub mod store;

pub use mail::{LogMailer, Mailer};
pub use repositories::{
    AuthRepository, AuthStore, RepoKeyResolver, TableGateway, UserRepository, UserStore,
};
pub use store::{Datastore, MemoryStore};

#[cfg(any(test, feature = "test-utils"))]
pub use mail::MockMailer;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockAuthRepository, MockUserRepository};
