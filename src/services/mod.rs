//! Application services layer - use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
pub mod token_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator, TokenResponse};
pub use token_service::{Claims, SigningKeyResolver, TokenAuthority, TokenError};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use token_service::MockSigningKeyResolver;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
