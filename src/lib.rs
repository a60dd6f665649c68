//! Keygate - user lookup and token authentication over a document store
//!
//! The service exposes registration, login, password-reset and user-lookup
//! endpoints. All persistence goes through a generic document gateway bound
//! to a pluggable [`infra::store::Datastore`] backend, and authentication is
//! based on audience-scoped tokens that are revoked by replacing the signing
//! key stored per `(user, audience)` pair.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and password hashing
//! - **services**: Application use cases (auth, users, tokens)
//! - **infra**: Infrastructure concerns (storage, repositories, mail)
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{AuthRecord, CommonModel, PasswordHasher, SigningKeyRecord, User};
pub use errors::{AppError, AppResult};
pub use infra::store::{Datastore, MemoryStore};
