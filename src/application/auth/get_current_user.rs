use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::RoleName;

/// Response containing current user information
#[derive(Debug, Clone)]
pub struct GetCurrentUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,
  /// User's login name
  pub username: String,
  /// User's email address
  pub email: String,
  /// Roles currently assigned to the user
  pub roles: Vec<RoleName>,
  /// Timestamp when the account was created
  pub created_at: DateTime<Utc>,
}

/// Use case for resolving the user behind a bearer token
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  /// Creates a new instance of GetCurrentUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Validates the token and loads the asserted user's profile
  ///
  /// # Errors
  /// `TokenExpired` / `TokenInvalid` for a bad token; `UserNotFound` when
  /// the asserted identity no longer exists.
  pub async fn execute(&self, token: &str) -> Result<GetCurrentUserResponse, AuthError> {
    let user = self.auth_service.current_user(token).await?;

    Ok(GetCurrentUserResponse {
      user_id: user.id,
      username: user.username.clone(),
      email: user.email.clone(),
      roles: user.role_names(),
      created_at: user.created_at,
    })
  }
}
