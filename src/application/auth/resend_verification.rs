use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::Email;

/// Use case for re-sending a verification code
pub struct ResendVerificationUseCase {
  auth_service: Arc<AuthService>,
}

impl ResendVerificationUseCase {
  /// Creates a new instance of ResendVerificationUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Re-issues a code for the account behind `email`, superseding any
  /// outstanding one.
  ///
  /// # Errors
  /// `UserNotFound` for an unknown email, `AlreadyVerified` if the account
  /// no longer needs verification.
  pub async fn execute(&self, email: String) -> Result<(), AuthError> {
    let email = Email::new(email)?;

    self.auth_service.resend_verification(email).await
  }
}
