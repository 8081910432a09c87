pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  CurrentUserResponse, ErrorResponse, MessageResponse, ResendVerificationRequest,
  ResetPasswordRequest, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse,
  VerifyEmailRequest,
};
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{AuthClaims, AuthMiddleware, RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::configure_auth_routes;
