//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TOKEN_MINUTES, MIN_GLOBAL_SALT_LENGTH,
    RESET_TOKEN_MINUTES, SALT_SIZE_BYTES,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    global_salt: String,
    pub salt_size_bytes: usize,
    pub default_token_minutes: i64,
    pub reset_token_minutes: i64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("global_salt", &"[REDACTED]")
            .field("salt_size_bytes", &self.salt_size_bytes)
            .field("default_token_minutes", &self.default_token_minutes)
            .field("reset_token_minutes", &self.reset_token_minutes)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if GLOBAL_SALT is not set in a release build or is too short.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let global_salt = env::var("GLOBAL_SALT").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("GLOBAL_SALT not set, using insecure default for development");
                "dev-global-salt-not-a-secret".to_string()
            } else {
                panic!("GLOBAL_SALT environment variable must be set in production");
            }
        });

        if global_salt.len() < MIN_GLOBAL_SALT_LENGTH {
            panic!(
                "GLOBAL_SALT must be at least {} characters long",
                MIN_GLOBAL_SALT_LENGTH
            );
        }

        Self {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            global_salt,
            salt_size_bytes: env::var("SALT_SIZE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(SALT_SIZE_BYTES),
            default_token_minutes: env::var("DEFAULT_TOKEN_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_MINUTES),
            reset_token_minutes: env::var("RESET_TOKEN_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(RESET_TOKEN_MINUTES),
        }
    }

    /// Get the application-wide salt mixed into every password hash.
    pub fn global_salt(&self) -> &str {
        &self.global_salt
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
