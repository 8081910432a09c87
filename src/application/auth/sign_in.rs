use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for authenticating a user
#[derive(Debug, Clone)]
pub struct SignInCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text)
  pub password: String,
}

/// Response after successful authentication
#[derive(Debug, Clone)]
pub struct SignInResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,
  /// Signed bearer token for subsequent requests
  pub token: String,
  /// Embedded token expiry
  pub expires_at: DateTime<Utc>,
}

/// Use case for signing in
pub struct SignInUseCase {
  auth_service: Arc<AuthService>,
}

impl SignInUseCase {
  /// Creates a new instance of SignInUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the sign-in use case
  ///
  /// # Errors
  /// `InvalidCredentials` for every authentication failure; the caller
  /// cannot tell an unknown account from a wrong password or a
  /// not-yet-verified account.
  pub async fn execute(&self, command: SignInCommand) -> Result<SignInResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password).map_err(|_| AuthError::InvalidCredentials)?;

    let (user, issued) = self.auth_service.sign_in(email, password).await?;

    Ok(SignInResponse {
      user_id: user.id,
      token: issued.token,
      expires_at: issued.expires_at,
    })
  }
}
