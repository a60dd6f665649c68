//! Password hashing - salted SHAKE-256 digests.
//!
//! Hashing is deterministic for a given `(password, salt, global salt)`
//! triple: the per-user salt and the application-wide salt are absorbed as
//! the keyed portion of the XOF, followed by the password, and exactly 32
//! bytes are squeezed out. Salts and digests travel base64-encoded.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};
use subtle::ConstantTimeEq;

use crate::errors::{AppError, AppResult};

/// Number of bytes squeezed out of the XOF (256-bit security strength).
const HASH_OUTPUT_BYTES: usize = 32;

/// Salted password hasher.
///
/// Salt size and the application-wide salt are injected here instead of
/// living as global constants, so tests and deployments can differ.
#[derive(Clone)]
pub struct PasswordHasher {
    salt_size_bytes: usize,
    global_salt: String,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("salt_size_bytes", &self.salt_size_bytes)
            .field("global_salt", &"[REDACTED]")
            .finish()
    }
}

impl PasswordHasher {
    /// Create a hasher with an explicit salt size and application salt.
    pub fn new(salt_size_bytes: usize, global_salt: impl Into<String>) -> Self {
        Self {
            salt_size_bytes,
            global_salt: global_salt.into(),
        }
    }

    /// Generate a fresh random salt, base64-encoded.
    ///
    /// # Panics
    /// Panics if the OS randomness source fails; running without entropy
    /// is a process-level fault, not a recoverable error.
    pub fn generate_salt(&self) -> String {
        let mut buf = vec![0u8; self.salt_size_bytes];
        OsRng.fill_bytes(&mut buf);
        STANDARD.encode(buf)
    }

    /// Hash a password with the given per-user salt.
    ///
    /// The only failure mode is a salt that is not valid base64.
    pub fn hash_password(&self, password: &str, salt: &str) -> AppResult<String> {
        let decoded_salt = STANDARD
            .decode(salt)
            .map_err(|e| AppError::internal(format!("salt is not valid base64: {e}")))?;

        // Key the XOF with salt ++ global salt, then absorb the password.
        let mut hasher = Shake256::default();
        hasher.update(&decoded_salt);
        hasher.update(self.global_salt.as_bytes());
        hasher.update(password.as_bytes());

        let mut out = [0u8; HASH_OUTPUT_BYTES];
        hasher.finalize_xof().read(&mut out);

        Ok(STANDARD.encode(out))
    }

    /// Verify a password against a stored digest.
    ///
    /// Recomputes the digest and compares in constant time. Any hashing
    /// failure yields `false`, never an error.
    pub fn validate_password(&self, password: &str, stored_hash: &str, salt: &str) -> bool {
        match self.hash_password(password, salt) {
            Ok(computed) => computed.as_bytes().ct_eq(stored_hash.as_bytes()).into(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(32, "test-global-salt")
    }

    #[test]
    fn test_hash_and_validate_roundtrip() {
        let h = hasher();
        let salt = h.generate_salt();
        let digest = h.hash_password("correct horse", &salt).unwrap();

        assert!(h.validate_password("correct horse", &digest, &salt));
        assert!(!h.validate_password("wrong horse", &digest, &salt));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let h = hasher();
        let salt = h.generate_salt();

        let first = h.hash_password("p1", &salt).unwrap();
        let second = h.hash_password("p1", &salt).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_changing_any_input_changes_digest() {
        let h = hasher();
        let other = PasswordHasher::new(32, "different-global-salt");
        let salt = h.generate_salt();
        let salt2 = h.generate_salt();

        let base = h.hash_password("p1", &salt).unwrap();
        assert_ne!(base, h.hash_password("p2", &salt).unwrap());
        assert_ne!(base, h.hash_password("p1", &salt2).unwrap());
        assert_ne!(base, other.hash_password("p1", &salt).unwrap());
    }

    #[test]
    fn test_salts_are_unique() {
        let h = hasher();
        assert_ne!(h.generate_salt(), h.generate_salt());
    }

    #[test]
    fn test_invalid_salt_encoding() {
        let h = hasher();
        assert!(h.hash_password("p1", "*** not base64 ***").is_err());
        // Validation swallows the failure
        assert!(!h.validate_password("p1", "whatever", "*** not base64 ***"));
    }

    #[test]
    fn test_digest_is_32_bytes() {
        let h = hasher();
        let salt = h.generate_salt();
        let digest = h.hash_password("p1", &salt).unwrap();
        let raw = STANDARD.decode(digest).unwrap();
        assert_eq!(raw.len(), HASH_OUTPUT_BYTES);
    }
}
