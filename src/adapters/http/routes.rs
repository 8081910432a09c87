use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{
  GetCurrentUserUseCase, ResendVerificationUseCase, ResetPasswordUseCase, SignInUseCase,
  SignUpUseCase, VerifyEmailUseCase,
};
use crate::domain::auth::ports::TokenIssuer;

use super::handlers::auth::{
  current_user_handler, resend_verification_handler, reset_password_handler, sign_in_handler,
  sign_up_handler, verify_email_handler,
};
use super::middleware::AuthMiddleware;

/// Configure account lifecycle routes
///
/// Mounts all auth endpoints under the provided scope (e.g. /api/v1/auth).
///
/// # Routes
///
/// - POST /signup - Register a new account (201, 409 on conflict)
/// - POST /signup/resend - Re-issue a verification code (200/404/409)
/// - POST /signup/verify - Verify an email with a one-time code (200/400)
/// - POST /signin - Authenticate and obtain a bearer token (200/401)
/// - POST /reset-password - Replace the password (201/401/404)
/// - GET /me - Current user's profile (bearer-protected)
///
/// # Arguments
///
/// * `sign_up_use_case` - Use case for account registration
/// * `resend_use_case` - Use case for re-sending verification codes
/// * `verify_use_case` - Use case for email verification
/// * `sign_in_use_case` - Use case for authentication
/// * `reset_password_use_case` - Use case for password reset
/// * `get_user_use_case` - Use case for resolving the current user
/// * `token_issuer` - Validator backing the bearer-auth middleware
#[allow(clippy::too_many_arguments)]
pub fn configure_auth_routes(
  cfg: &mut web::ServiceConfig,
  sign_up_use_case: Arc<SignUpUseCase>,
  resend_use_case: Arc<ResendVerificationUseCase>,
  verify_use_case: Arc<VerifyEmailUseCase>,
  sign_in_use_case: Arc<SignInUseCase>,
  reset_password_use_case: Arc<ResetPasswordUseCase>,
  get_user_use_case: Arc<GetCurrentUserUseCase>,
  token_issuer: Arc<dyn TokenIssuer>,
) {
  // Store use cases in app data so handlers can access them
  cfg
    .app_data(web::Data::new(sign_up_use_case))
    .app_data(web::Data::new(resend_use_case))
    .app_data(web::Data::new(verify_use_case))
    .app_data(web::Data::new(sign_in_use_case))
    .app_data(web::Data::new(reset_password_use_case))
    // Configure routes
    .route("/signup", web::post().to(sign_up_handler))
    .route("/signup/resend", web::post().to(resend_verification_handler))
    .route("/signup/verify", web::post().to(verify_email_handler))
    .route("/signin", web::post().to(sign_in_handler))
    .route("/reset-password", web::post().to(reset_password_handler))
    // Protected routes validate the bearer token before the handler runs
    .service(
      web::scope("/me")
        .wrap(AuthMiddleware::new(token_issuer))
        .app_data(web::Data::new(get_user_use_case))
        .route("", web::get().to(current_user_handler)),
    );
}
