//! End-to-end authentication flows over the in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use keygate::config::{AUD_DEFAULT, AUD_RESET_PASS};
use keygate::domain::PasswordHasher;
use keygate::errors::{AppError, AppResult};
use keygate::infra::{
    AuthRepository, AuthStore, Datastore, Mailer, MemoryStore, RepoKeyResolver, UserStore,
};
use keygate::services::{
    AuthService, Authenticator, TokenAuthority, TokenError, UserManager, UserService,
};

/// Mailer that records every message instead of sending it.
#[derive(Default)]
struct CapturingMailer {
    sent: Mutex<Vec<(Vec<String>, String)>>,
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send_mail(&self, recipients: &[String], content: &str) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((recipients.to_vec(), content.to_string()));
        Ok(())
    }
}

struct Harness {
    auth_repo: Arc<dyn AuthRepository>,
    auth_service: Authenticator,
    tokens: Arc<TokenAuthority>,
    mailer: Arc<CapturingMailer>,
}

impl Harness {
    fn new() -> Self {
        let store: Arc<dyn Datastore> = Arc::new(MemoryStore::new());
        let auth_repo: Arc<dyn AuthRepository> = Arc::new(AuthStore::new(store.clone()));
        let users: Arc<dyn UserService> =
            Arc::new(UserManager::new(Arc::new(UserStore::new(store))));
        let tokens = Arc::new(TokenAuthority::new(43_200, 30));
        let mailer = Arc::new(CapturingMailer::default());

        let auth_service = Authenticator::new(
            auth_repo.clone(),
            users,
            tokens.clone(),
            PasswordHasher::new(32, "flow-test-global-salt"),
            mailer.clone(),
        );

        Self {
            auth_repo,
            auth_service,
            tokens,
            mailer,
        }
    }

    async fn parse(&self, token: &str) -> Result<String, TokenError> {
        let resolver = RepoKeyResolver(self.auth_repo.clone());
        self.tokens.parse_token(token, &resolver).await
    }
}

#[tokio::test]
async fn test_register_then_login_yields_valid_token() {
    let h = Harness::new();

    let user = h
        .auth_service
        .register("a@x.com".to_string(), "p1".to_string())
        .await
        .unwrap();
    assert!(!user.id.is_empty());

    let resp = h
        .auth_service
        .login("a@x.com".to_string(), "p1".to_string(), None)
        .await
        .unwrap();
    assert!(!resp.access_token.is_empty());

    // The signing key was persisted for the default audience
    h.auth_repo
        .get_signing_key(&user.id, AUD_DEFAULT)
        .await
        .unwrap();

    // And the token validates back to the registered user
    let subject = h.parse(&resp.access_token).await.unwrap();
    assert_eq!(subject, user.id);
}

#[tokio::test]
async fn test_login_with_wrong_password_persists_nothing() {
    let h = Harness::new();

    let user = h
        .auth_service
        .register("a@x.com".to_string(), "p1".to_string())
        .await
        .unwrap();

    let err = h
        .auth_service
        .login("a@x.com".to_string(), "p2".to_string(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));

    let lookup = h.auth_repo.get_signing_key(&user.id, AUD_DEFAULT).await;
    assert!(matches!(lookup, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_login_with_unknown_email_fails() {
    let h = Harness::new();

    let err = h
        .auth_service
        .login("ghost@x.com".to_string(), "p1".to_string(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_relogin_revokes_previous_session_token() {
    let h = Harness::new();

    h.auth_service
        .register("a@x.com".to_string(), "p1".to_string())
        .await
        .unwrap();

    let first = h
        .auth_service
        .login("a@x.com".to_string(), "p1".to_string(), None)
        .await
        .unwrap();
    let second = h
        .auth_service
        .login("a@x.com".to_string(), "p1".to_string(), None)
        .await
        .unwrap();

    // The second login replaced the signing key, killing the first token
    // even though it has not expired
    let err = h.parse(&first.access_token).await.unwrap_err();
    assert!(matches!(err, TokenError::SignatureMismatch));

    h.parse(&second.access_token).await.unwrap();
}

#[tokio::test]
async fn test_revocation_is_scoped_to_audience() {
    let h = Harness::new();

    h.auth_service
        .register("a@x.com".to_string(), "p1".to_string())
        .await
        .unwrap();

    let session = h
        .auth_service
        .login("a@x.com".to_string(), "p1".to_string(), None)
        .await
        .unwrap();

    // A reset request writes a key under its own audience; the session
    // key (and token) must survive
    h.auth_service
        .request_password_reset("a@x.com".to_string())
        .await
        .unwrap();

    h.parse(&session.access_token).await.unwrap();
}

#[tokio::test]
async fn test_reset_for_unknown_email_succeeds_without_side_effects() {
    let h = Harness::new();

    h.auth_service
        .request_password_reset("ghost@x.com".to_string())
        .await
        .unwrap();

    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_reset_mails_a_token_that_validates() {
    let h = Harness::new();

    let user = h
        .auth_service
        .register("a@x.com".to_string(), "p1".to_string())
        .await
        .unwrap();

    h.auth_service
        .request_password_reset("a@x.com".to_string())
        .await
        .unwrap();

    let sent = h.mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    let (recipients, token) = &sent[0];
    assert_eq!(recipients, &vec!["a@x.com".to_string()]);

    // The mailed content is the reset token itself, scoped to the reset
    // audience and signed with the freshly stored key
    let subject = h.parse(token).await.unwrap();
    assert_eq!(&subject, &user.id);

    h.auth_repo
        .get_signing_key(&user.id, AUD_RESET_PASS)
        .await
        .unwrap();
}
