use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

use crate::domain::auth::errors::NotificationError;
use crate::domain::auth::ports::NotificationGateway;
use crate::domain::auth::value_objects::Email;
use crate::infrastructure::config::SmtpConfig;

/// SMTP implementation of the NotificationGateway trait
///
/// The blocking lettre transport runs on the blocking thread pool so the
/// async runtime never stalls on a slow relay.
pub struct SmtpNotificationGateway {
  mailer: SmtpTransport,
  from: Mailbox,
}

impl SmtpNotificationGateway {
  /// Creates a gateway from SMTP relay configuration
  pub fn new(config: &SmtpConfig) -> Result<Self, NotificationError> {
    let from = config
      .from_address
      .parse::<Mailbox>()
      .map_err(|e| NotificationError::InvalidAddress(e.to_string()))?;

    let creds = Credentials::new(config.username.clone(), config.password.clone());

    let mailer = SmtpTransport::relay(&config.host)
      .map_err(|e| NotificationError::Delivery(e.to_string()))?
      .credentials(creds)
      .port(config.port)
      .timeout(Some(Duration::from_secs(10)))
      .build();

    Ok(Self { mailer, from })
  }

  async fn send(
    &self,
    to: &Email,
    subject: &str,
    body: String,
  ) -> Result<(), NotificationError> {
    let recipient = to
      .as_str()
      .parse::<Mailbox>()
      .map_err(|e| NotificationError::InvalidAddress(e.to_string()))?;

    let message = Message::builder()
      .from(self.from.clone())
      .to(recipient)
      .subject(subject)
      .body(body)
      .map_err(|e| NotificationError::MessageBuild(e.to_string()))?;

    let mailer = self.mailer.clone();
    let result = tokio::task::spawn_blocking(move || mailer.send(&message))
      .await
      .map_err(|e| NotificationError::Delivery(e.to_string()))?;

    match result {
      Ok(_) => {
        tracing::info!(to = %to, subject = %subject, "email sent");
        Ok(())
      }
      Err(e) => {
        tracing::error!(to = %to, error = %e, "email delivery failed");
        Err(NotificationError::Delivery(e.to_string()))
      }
    }
  }
}

#[async_trait]
impl NotificationGateway for SmtpNotificationGateway {
  async fn send_verification_code(
    &self,
    email: &Email,
    code: &str,
  ) -> Result<(), NotificationError> {
    let body = format!(
      "Welcome to Pockit!\n\n\
       Your verification code is: {}\n\n\
       Enter it to activate your account. The code expires shortly, and\n\
       requesting a new one invalidates this one.\n",
      code
    );

    self.send(email, "Verify your Pockit account", body).await
  }

  async fn send_password_reset_notice(&self, email: &Email) -> Result<(), NotificationError> {
    let body = "Your Pockit password was just changed.\n\n\
       If this was not you, please contact support immediately.\n"
      .to_string();

    self.send(email, "Your Pockit password was changed", body).await
  }
}
