use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for resetting a password with current-password confirmation
#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
  /// User's email address
  pub email: String,
  /// Current password (plain text)
  pub current_password: String,
  /// Replacement password (plain text, will be hashed)
  pub new_password: String,
}

/// Use case for resetting a password
pub struct ResetPasswordUseCase {
  auth_service: Arc<AuthService>,
}

impl ResetPasswordUseCase {
  /// Creates a new instance of ResetPasswordUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the reset-password use case
  ///
  /// # Errors
  /// `UserNotFound` for an unknown email; `InvalidCredentials` when the
  /// current password does not match. Nothing is stored until both checks
  /// pass.
  pub async fn execute(&self, command: ResetPasswordCommand) -> Result<(), AuthError> {
    let email = Email::new(command.email)?;
    let current_password =
      Password::new(command.current_password).map_err(|_| AuthError::InvalidCredentials)?;
    let new_password = Password::new(command.new_password)?;

    self
      .auth_service
      .reset_password(email, current_password, new_password)
      .await
  }
}
