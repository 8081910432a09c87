use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::Email;

/// Command for verifying an email address with a one-time code
#[derive(Debug, Clone)]
pub struct VerifyEmailCommand {
  /// Email address the code was delivered to
  pub email: String,
  /// Submitted one-time code
  pub code: String,
}

/// Response after successful verification
#[derive(Debug, Clone)]
pub struct VerifyEmailResponse {
  /// Identifier of the verified user
  pub user_id: Uuid,
}

/// Use case for verifying an account's email address
pub struct VerifyEmailUseCase {
  auth_service: Arc<AuthService>,
}

impl VerifyEmailUseCase {
  /// Creates a new instance of VerifyEmailUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the verification use case
  ///
  /// # Errors
  /// `VerificationFailed` when the code is wrong, expired or already used;
  /// `UserNotFound` for an unknown email.
  pub async fn execute(&self, command: VerifyEmailCommand) -> Result<VerifyEmailResponse, AuthError> {
    let email = Email::new(command.email)?;

    let user = self.auth_service.verify_email(email, &command.code).await?;

    Ok(VerifyEmailResponse { user_id: user.id })
  }
}
