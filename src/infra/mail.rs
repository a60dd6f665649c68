//! Mail collaborator.
//!
//! The reset-password flow hands a token off to a mail sender and moves
//! on; delivery is fire-and-forget from the service's point of view. The
//! default implementation logs the message. Configure a real transport by
//! swapping the [`Mailer`] wired into the application state.

use async_trait::async_trait;

use crate::errors::AppResult;

/// Outbound mail capability.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(&self, recipients: &[String], content: &str) -> AppResult<()>;
}

/// Development mailer: logs instead of sending.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_mail(&self, recipients: &[String], content: &str) -> AppResult<()> {
        tracing::info!(
            to = %recipients.join(", "),
            "=== MAIL (not sent) ===\n{}\n=======================",
            content
        );
        Ok(())
    }
}
