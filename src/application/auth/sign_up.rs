use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::VerificationStatus;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password, Username};

/// Command for registering a new account
#[derive(Debug, Clone)]
pub struct SignUpCommand {
  /// Desired login name
  pub username: String,
  /// User's email address
  pub email: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
}

/// Response after successful registration
#[derive(Debug, Clone)]
pub struct SignUpResponse {
  /// Unique identifier of the newly created user
  pub user_id: Uuid,
  /// Login name as stored
  pub username: String,
  /// Email address as stored (normalized)
  pub email: String,
  /// Verification state of the new account (always pending)
  pub status: VerificationStatus,
}

/// Use case for registering a new account
pub struct SignUpUseCase {
  auth_service: Arc<AuthService>,
}

impl SignUpUseCase {
  /// Creates a new instance of SignUpUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the sign-up use case
  ///
  /// # Errors
  /// Returns `AuthError::UserAlreadyExists` on a username/email conflict and
  /// value-object errors for malformed input.
  pub async fn execute(&self, command: SignUpCommand) -> Result<SignUpResponse, AuthError> {
    let username = Username::new(command.username)?;
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let user = self.auth_service.sign_up(username, email, password).await?;

    Ok(SignUpResponse {
      user_id: user.id,
      username: user.username,
      email: user.email,
      status: user.status,
    })
  }
}
