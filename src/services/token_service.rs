//! Token authority - issues and validates audience-scoped tokens.
//!
//! Tokens are HS256 claims tokens carrying `{ sub, aud, iat, exp }`. The
//! authority keeps no state: a token's fate is decided at validation time
//! from the wall clock and from whichever signing key is currently on
//! record for its `(subject, audience)` pair. Replacing that key is the
//! only revocation mechanism; there is no denylist.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppResult;

/// Claims payload embedded in every token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Token issuance and validation errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token expired")]
    Expired,

    #[error("token signature mismatch")]
    SignatureMismatch,

    #[error("signing key lookup failed: {0}")]
    KeyLookup(String),

    #[error("failed to encode token: {0}")]
    Encoding(jsonwebtoken::errors::Error),
}

/// Source of the live signing key for a `(subject, audience)` pair.
///
/// Implemented by the credential store; validation re-fetches the key on
/// every call so a replaced key takes effect immediately.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait SigningKeyResolver: Send + Sync {
    async fn signing_key(&self, uid: &str, audience: &str) -> AppResult<String>;
}

/// Stateless token authority with configured lifetimes.
#[derive(Debug, Clone)]
pub struct TokenAuthority {
    default_token_minutes: i64,
    reset_token_minutes: i64,
}

impl TokenAuthority {
    pub fn new(default_token_minutes: i64, reset_token_minutes: i64) -> Self {
        Self {
            default_token_minutes,
            reset_token_minutes,
        }
    }

    /// Lifetime of session tokens in minutes.
    pub fn default_token_minutes(&self) -> i64 {
        self.default_token_minutes
    }

    /// Lifetime of password-reset tokens in minutes.
    pub fn reset_token_minutes(&self) -> i64 {
        self.reset_token_minutes
    }

    /// Issue a token for `subject` scoped to `audience`, valid for
    /// `expiry_minutes` from `now`, signed with `signing_key`.
    pub fn create_token(
        &self,
        subject: &str,
        audience: &str,
        expiry_minutes: i64,
        signing_key: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            aud: audience.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expiry_minutes)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(signing_key.as_bytes()),
        )
        .map_err(TokenError::Encoding)
    }

    /// Validate a token and return its subject.
    ///
    /// The claimed subject and audience are read before verification so
    /// the resolver can fetch the key currently on record for that pair;
    /// signature and expiry are then checked against the fresh key.
    pub async fn parse_token(
        &self,
        token: &str,
        resolver: &dyn SigningKeyResolver,
    ) -> Result<String, TokenError> {
        // First pass: claims only, nothing is trusted yet.
        let mut unverified = Validation::new(Algorithm::HS256);
        unverified.insecure_disable_signature_validation();
        unverified.validate_exp = false;
        unverified.validate_aud = false;

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &unverified)
            .map_err(|_| TokenError::Malformed)?
            .claims;

        let key = resolver
            .signing_key(&claims.sub, &claims.aud)
            .await
            .map_err(|e| TokenError::KeyLookup(e.to_string()))?;

        // Second pass: full verification against the live key.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[claims.aud.as_str()]);
        validation.leeway = 0;

        let verified = decode::<Claims>(
            token,
            &DecodingKey::from_secret(key.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
            _ => TokenError::Malformed,
        })?;

        Ok(verified.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn authority() -> TokenAuthority {
        TokenAuthority::new(43_200, 30)
    }

    fn resolver_with_key(key: &str) -> MockSigningKeyResolver {
        let key = key.to_string();
        let mut resolver = MockSigningKeyResolver::new();
        resolver
            .expect_signing_key()
            .returning(move |_, _| Ok(key.clone()));
        resolver
    }

    #[tokio::test]
    async fn test_roundtrip_returns_subject() {
        let authority = authority();
        let token = authority
            .create_token("u1", "aud1", 30, "k1", Utc::now())
            .unwrap();

        let subject = authority
            .parse_token(&token, &resolver_with_key("k1"))
            .await
            .unwrap();
        assert_eq!(subject, "u1");
    }

    #[tokio::test]
    async fn test_replaced_key_invalidates_token() {
        let authority = authority();
        let token = authority
            .create_token("u1", "aud1", 30, "k1", Utc::now())
            .unwrap();

        let err = authority
            .parse_token(&token, &resolver_with_key("k2"))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::SignatureMismatch));
    }

    #[tokio::test]
    async fn test_expired_token_rejected_despite_valid_signature() {
        let authority = authority();
        let issued = Utc::now() - Duration::minutes(60);
        let token = authority
            .create_token("u1", "aud1", 30, "k1", issued)
            .unwrap();

        let err = authority
            .parse_token(&token, &resolver_with_key("k1"))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[tokio::test]
    async fn test_garbage_token_is_malformed() {
        let authority = authority();
        // Resolver must not be consulted for a token that cannot be decoded
        let resolver = MockSigningKeyResolver::new();

        let err = authority
            .parse_token("not-a-token", &resolver)
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }

    #[tokio::test]
    async fn test_resolver_failure_maps_to_key_lookup() {
        let authority = authority();
        let token = authority
            .create_token("u1", "aud1", 30, "k1", Utc::now())
            .unwrap();

        let mut resolver = MockSigningKeyResolver::new();
        resolver
            .expect_signing_key()
            .returning(|_, _| Err(AppError::NotFound));

        let err = authority.parse_token(&token, &resolver).await.unwrap_err();
        assert!(matches!(err, TokenError::KeyLookup(_)));
    }

    #[tokio::test]
    async fn test_resolver_receives_claimed_subject_and_audience() {
        let authority = authority();
        let token = authority
            .create_token("u7", "mobileAud", 30, "k1", Utc::now())
            .unwrap();

        let mut resolver = MockSigningKeyResolver::new();
        resolver
            .expect_signing_key()
            .withf(|uid, aud| uid == "u7" && aud == "mobileAud")
            .returning(|_, _| Ok("k1".to_string()));

        authority.parse_token(&token, &resolver).await.unwrap();
    }
}
