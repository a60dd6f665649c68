//! Authentication service - registration, login, and password reset.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use super::token_service::TokenAuthority;
use super::user_service::UserService;
use crate::config::{AUD_DEFAULT, AUD_RESET_PASS, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};
use crate::domain::{PasswordHasher, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{AuthRepository, Mailer};

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed access token
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 2592000)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user by email
    async fn register(&self, email: String, password: String) -> AppResult<User>;

    /// Login and return a session token scoped to `audience`
    async fn login(
        &self,
        email: String,
        password: String,
        audience: Option<String>,
    ) -> AppResult<TokenResponse>;

    /// Issue and mail a short-lived password-reset token
    async fn request_password_reset(&self, email: String) -> AppResult<()>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    auth_repo: Arc<dyn AuthRepository>,
    users: Arc<dyn UserService>,
    tokens: Arc<TokenAuthority>,
    hasher: PasswordHasher,
    mailer: Arc<dyn Mailer>,
}

impl Authenticator {
    pub fn new(
        auth_repo: Arc<dyn AuthRepository>,
        users: Arc<dyn UserService>,
        tokens: Arc<TokenAuthority>,
        hasher: PasswordHasher,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            auth_repo,
            users,
            tokens,
            hasher,
            mailer,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, email: String, password: String) -> AppResult<User> {
        let salt = self.hasher.generate_salt();
        let hashed_pass = self.hasher.hash_password(&password, &salt)?;

        // User and credential creation are independent writes with no
        // atomicity between them; a failure here surfaces as an error and
        // is never silently retried.
        let user = self.users.create_user(&email).await?;
        self.auth_repo
            .create_auth(&user.id, &email, &hashed_pass, &salt)
            .await?;

        Ok(user)
    }

    async fn login(
        &self,
        email: String,
        password: String,
        audience: Option<String>,
    ) -> AppResult<TokenResponse> {
        let audience = match audience {
            Some(aud) if !aud.is_empty() => aud,
            _ => AUD_DEFAULT.to_string(),
        };

        // One error for unknown email and wrong password alike, so the
        // response does not reveal which emails are registered.
        let auth = self
            .auth_repo
            .get_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self
            .hasher
            .validate_password(&password, &auth.hashed_pass, &auth.salt)
        {
            return Err(AppError::InvalidCredentials);
        }

        let signing_key = self.hasher.generate_salt();
        let minutes = self.tokens.default_token_minutes();
        let token = self
            .tokens
            .create_token(&auth.uid, &audience, minutes, &signing_key, Utc::now())?;

        // Saving the key replaces any previous one for this audience,
        // revoking earlier sessions.
        self.auth_repo
            .save_signed_key(&auth.uid, &audience, &signing_key)
            .await?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: minutes * SECONDS_PER_MINUTE,
        })
    }

    async fn request_password_reset(&self, email: String) -> AppResult<()> {
        let auth = match self.auth_repo.get_by_email(&email).await? {
            Some(auth) => auth,
            // Succeed without side effects when the email is unknown, so
            // the endpoint cannot be used to probe for registered users.
            None => return Ok(()),
        };

        let signing_key = self.hasher.generate_salt();
        let token = self.tokens.create_token(
            &auth.uid,
            AUD_RESET_PASS,
            self.tokens.reset_token_minutes(),
            &signing_key,
            Utc::now(),
        )?;

        self.auth_repo
            .save_signed_key(&auth.uid, AUD_RESET_PASS, &signing_key)
            .await?;

        // Fire and forget; a delivery failure must not fail the request.
        if let Err(e) = self
            .mailer
            .send_mail(std::slice::from_ref(&auth.email), &token)
            .await
        {
            tracing::warn!(email = %auth.email, "failed to send reset mail: {e}");
        }

        Ok(())
    }
}
