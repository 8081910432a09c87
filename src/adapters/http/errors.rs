use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::auth::errors::{AuthError, RepositoryError};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication / account lifecycle error
  Auth(AuthErrorKind),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Serialize)]
pub enum AuthErrorKind {
  /// Invalid credentials (401)
  InvalidCredentials,

  /// Username or email already taken (409)
  UserAlreadyExists,

  /// User not found (404)
  UserNotFound,

  /// Account already verified (409)
  AlreadyVerified,

  /// Verification code invalid, expired or consumed (400)
  VerificationFailed,

  /// Bearer token expired (401)
  TokenExpired,

  /// Bearer token invalid or missing (401)
  TokenInvalid,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthErrorKind::UserAlreadyExists => StatusCode::CONFLICT,
        AuthErrorKind::UserNotFound => StatusCode::NOT_FOUND,
        AuthErrorKind::AlreadyVerified => StatusCode::CONFLICT,
        AuthErrorKind::VerificationFailed => StatusCode::BAD_REQUEST,
        AuthErrorKind::TokenExpired => StatusCode::UNAUTHORIZED,
        AuthErrorKind::TokenInvalid => StatusCode::UNAUTHORIZED,
      },
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => (
          "invalid_credentials",
          "Invalid email or password".to_string(),
        ),
        AuthErrorKind::UserAlreadyExists => (
          "user_already_exists",
          "An account with this username or email already exists".to_string(),
        ),
        AuthErrorKind::UserNotFound => ("user_not_found", "User not found".to_string()),
        AuthErrorKind::AlreadyVerified => (
          "already_verified",
          "This account is already verified".to_string(),
        ),
        AuthErrorKind::VerificationFailed => (
          "verification_failed",
          "Verification code is invalid or has expired".to_string(),
        ),
        AuthErrorKind::TokenExpired => ("token_expired", "Token has expired".to_string()),
        AuthErrorKind::TokenInvalid => (
          "token_invalid",
          "Invalid or missing authorization token".to_string(),
        ),
      },
      ApiError::Internal(msg) => {
        // Don't expose internal error details to the caller
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::UserAlreadyExists => ApiError::Auth(AuthErrorKind::UserAlreadyExists),
      AuthError::UserNotFound => ApiError::Auth(AuthErrorKind::UserNotFound),
      AuthError::AlreadyVerified => ApiError::Auth(AuthErrorKind::AlreadyVerified),
      AuthError::VerificationFailed => ApiError::Auth(AuthErrorKind::VerificationFailed),
      AuthError::TokenExpired => ApiError::Auth(AuthErrorKind::TokenExpired),
      AuthError::TokenInvalid => ApiError::Auth(AuthErrorKind::TokenInvalid),
      AuthError::TokenIssuance(msg) => ApiError::Internal(msg),
      AuthError::ValueObject(err) => ApiError::Validation(err.to_string()),
      AuthError::Repository(err) => match err {
        RepositoryError::NotFound => ApiError::Auth(AuthErrorKind::UserNotFound),
        RepositoryError::DuplicateKey(_) => ApiError::Auth(AuthErrorKind::UserAlreadyExists),
        _ => ApiError::Internal(err.to_string()),
      },
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidCredentials).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::UserAlreadyExists).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::UserNotFound).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::VerificationFailed).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_auth_error_conversion() {
    let api_error: ApiError = AuthError::InvalidCredentials.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = AuthError::UserAlreadyExists.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = AuthError::TokenExpired.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = AuthError::AlreadyVerified.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);
  }

  #[test]
  fn test_storage_conflict_maps_to_conflict_status() {
    // The race loser's unique-violation must surface exactly like the
    // pre-check rejection
    let api_error: ApiError =
      AuthError::Repository(RepositoryError::DuplicateKey("users_email_key".into())).into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);
  }
}
