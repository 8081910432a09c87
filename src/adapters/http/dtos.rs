use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request for account registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
  /// Desired login name
  #[validate(length(
    min = 3,
    max = 32,
    message = "Username must be between 3 and 32 characters"
  ))]
  pub username: String,

  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// User's password
  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,
}

/// Request for re-sending a verification code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendVerificationRequest {
  /// Email address the account was registered with
  #[validate(email(message = "Invalid email format"))]
  pub email: String,
}

/// Request for verifying an email address
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyEmailRequest {
  /// Email address the code was delivered to
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// Submitted one-time code
  #[validate(length(min = 1, message = "Verification code is required"))]
  pub code: String,
}

/// Request for signing in
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// User's password
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Request for resetting a password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// Current password, for confirmation
  #[validate(length(min = 1, message = "Current password is required"))]
  pub current_password: String,

  /// Replacement password
  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub new_password: String,
}

/// Response after successful registration
#[derive(Debug, Clone, Serialize)]
pub struct SignUpResponse {
  /// Unique identifier of the newly created user
  pub user_id: Uuid,

  /// Login name as stored
  pub username: String,

  /// Email address as stored (normalized)
  pub email: String,

  /// Verification state of the account
  pub status: String,
}

/// Response after successful sign-in
#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
  /// Signed bearer token
  pub token: String,

  /// Token scheme for the Authorization header
  pub token_type: String,

  /// Embedded token expiry
  pub expires_at: DateTime<Utc>,
}

/// Response describing the authenticated user
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,

  /// User's login name
  pub username: String,

  /// User's email address
  pub email: String,

  /// Role names assigned to the user
  pub roles: Vec<String>,

  /// Timestamp when the account was created
  pub created_at: DateTime<Utc>,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
  /// Success message
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable message
  pub message: String,

  /// Optional extra context
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<String>,
}
