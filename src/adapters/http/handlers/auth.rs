use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{
    CurrentUserResponse, MessageResponse, ResendVerificationRequest, ResetPasswordRequest,
    SignInRequest, SignInResponse, SignUpRequest, SignUpResponse, VerifyEmailRequest,
  },
  errors::ApiError,
};
use crate::application::auth::{
  GetCurrentUserUseCase, ResendVerificationUseCase, ResetPasswordCommand, ResetPasswordUseCase,
  SignInCommand, SignInUseCase, SignUpCommand, SignUpUseCase, VerifyEmailCommand,
  VerifyEmailUseCase,
};

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(req: &HttpRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.to_string())
    .ok_or_else(|| ApiError::Validation("Missing or invalid Authorization header".to_string()))
}

/// Handler for account registration
///
/// POST /signup
/// Body: SignUpRequest (JSON)
/// Response: SignUpResponse (JSON) with status 201
pub async fn sign_up_handler(
  request: web::Json<SignUpRequest>,
  use_case: web::Data<Arc<SignUpUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = SignUpCommand {
    username: request.username.clone(),
    email: request.email.clone(),
    password: request.password.clone(),
  };

  let response = use_case.execute(command).await?;

  let api_response = SignUpResponse {
    user_id: response.user_id,
    username: response.username,
    email: response.email,
    status: response.status.as_str().to_string(),
  };

  Ok(HttpResponse::Created().json(api_response))
}

/// Handler for re-sending a verification code
///
/// POST /signup/resend
/// Body: ResendVerificationRequest (JSON)
/// Response: MessageResponse (JSON) with status 200
pub async fn resend_verification_handler(
  request: web::Json<ResendVerificationRequest>,
  use_case: web::Data<Arc<ResendVerificationUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  use_case.execute(request.email.clone()).await?;

  Ok(HttpResponse::Ok().json(MessageResponse {
    message: "A new verification code has been sent".to_string(),
  }))
}

/// Handler for verifying an email address
///
/// POST /signup/verify
/// Body: VerifyEmailRequest (JSON)
/// Response: MessageResponse (JSON) with status 200
pub async fn verify_email_handler(
  request: web::Json<VerifyEmailRequest>,
  use_case: web::Data<Arc<VerifyEmailUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = VerifyEmailCommand {
    email: request.email.clone(),
    code: request.code.clone(),
  };

  use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(MessageResponse {
    message: "Account verified successfully".to_string(),
  }))
}

/// Handler for signing in
///
/// POST /signin
/// Body: SignInRequest (JSON)
/// Response: SignInResponse (JSON) with status 200
pub async fn sign_in_handler(
  request: web::Json<SignInRequest>,
  use_case: web::Data<Arc<SignInUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = SignInCommand {
    email: request.email.clone(),
    password: request.password.clone(),
  };

  let response = use_case.execute(command).await?;

  let api_response = SignInResponse {
    token: response.token,
    token_type: "Bearer".to_string(),
    expires_at: response.expires_at,
  };

  Ok(HttpResponse::Ok().json(api_response))
}

/// Handler for resetting a password
///
/// POST /reset-password
/// Body: ResetPasswordRequest (JSON)
/// Response: MessageResponse (JSON) with status 201
pub async fn reset_password_handler(
  request: web::Json<ResetPasswordRequest>,
  use_case: web::Data<Arc<ResetPasswordUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = ResetPasswordCommand {
    email: request.email.clone(),
    current_password: request.current_password.clone(),
    new_password: request.new_password.clone(),
  };

  use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(MessageResponse {
    message: "Password has been successfully reset".to_string(),
  }))
}

/// Handler for the authenticated user's profile
///
/// GET /me
/// Headers: Authorization: Bearer <token>
/// Response: CurrentUserResponse (JSON) with status 200
pub async fn current_user_handler(
  use_case: web::Data<Arc<GetCurrentUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let token = extract_bearer_token(&http_req)?;

  let response = use_case.execute(&token).await?;

  let api_response = CurrentUserResponse {
    user_id: response.user_id,
    username: response.username,
    email: response.email,
    roles: response.roles.iter().map(|r| r.as_str().to_string()).collect(),
    created_at: response.created_at,
  };

  Ok(HttpResponse::Ok().json(api_response))
}
