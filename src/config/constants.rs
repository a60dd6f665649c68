//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Size of password salts and signing keys in raw bytes
pub const SALT_SIZE_BYTES: usize = 32;

/// Lifetime of session tokens in minutes (30 days)
pub const DEFAULT_TOKEN_MINUTES: i64 = 30 * 24 * 60;

/// Lifetime of password-reset tokens in minutes
pub const RESET_TOKEN_MINUTES: i64 = 30;

/// Audience assigned to session tokens when the client names none
pub const AUD_DEFAULT: &str = "defaultAud";

/// Audience reserved for password-reset tokens
pub const AUD_RESET_PASS: &str = "resetPassAud";

/// Minimum length of the application-wide salt
pub const MIN_GLOBAL_SALT_LENGTH: usize = 12;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Token type identifier returned to clients
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Seconds per minute (for token expiration calculation)
pub const SECONDS_PER_MINUTE: i64 = 60;

// =============================================================================
// Collections
// =============================================================================

/// Collection holding user records
pub const COLLECTION_USERS: &str = "users";

/// Collection holding authentication records
pub const COLLECTION_AUTH: &str = "auth";

/// Collection holding per-(user, audience) signing keys
pub const COLLECTION_SIGNING_KEYS: &str = "signing_keys";

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items returned by a listing scan
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Maximum allowed items per scan to prevent excessive queries
pub const MAX_PAGE_SIZE: usize = 100;

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;
