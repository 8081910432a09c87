use async_trait::async_trait;

use crate::domain::auth::errors::NotificationError;
use crate::domain::auth::ports::NotificationGateway;
use crate::domain::auth::value_objects::Email;

/// Log-only implementation of the NotificationGateway trait
///
/// Used when no SMTP relay is configured (local development, CI). Messages
/// land in the logs instead of a mailbox.
pub struct LogNotificationGateway;

impl LogNotificationGateway {
  pub fn new() -> Self {
    Self
  }
}

impl Default for LogNotificationGateway {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl NotificationGateway for LogNotificationGateway {
  async fn send_verification_code(
    &self,
    email: &Email,
    code: &str,
  ) -> Result<(), NotificationError> {
    tracing::info!(to = %email, code = %code, "verification code (log-only gateway)");
    Ok(())
  }

  async fn send_password_reset_notice(&self, email: &Email) -> Result<(), NotificationError> {
    tracing::info!(to = %email, "password reset notice (log-only gateway)");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_log_gateway_always_succeeds() {
    let gateway = LogNotificationGateway::new();
    let email = Email::new("dev@example.com").unwrap();

    assert!(gateway.send_verification_code(&email, "123456").await.is_ok());
    assert!(gateway.send_password_reset_notice(&email).await.is_ok());
  }
}
