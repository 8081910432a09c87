use actix_web::{
  Error, HttpMessage, HttpResponse,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  domain::auth::ports::{TokenClaims, TokenIssuer},
};

/// Authentication middleware that validates bearer tokens in-process
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Validates signature and expiry through the token issuer (no store
///    lookup)
/// 3. Attaches the token claims to request extensions for downstream
///    handlers
/// 4. Returns 401 Unauthorized if the token is missing, invalid or expired
pub struct AuthMiddleware {
  token_issuer: Arc<dyn TokenIssuer>,
}

impl AuthMiddleware {
  /// Creates a new authentication middleware
  pub fn new(token_issuer: Arc<dyn TokenIssuer>) -> Self {
    Self { token_issuer }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      token_issuer: self.token_issuer.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  token_issuer: Arc<dyn TokenIssuer>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let token_issuer = self.token_issuer.clone();

    Box::pin(async move {
      // Extract bearer token from Authorization header
      let token = match extract_bearer_token(&req) {
        Ok(token) => token,
        Err(e) => {
          let (request, _) = req.into_parts();
          let response = HttpResponse::Unauthorized().json(e).map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      // Signature + expiry check only; the token is self-verifying
      let claims = match token_issuer.validate(&token) {
        Ok(claims) => claims,
        Err(e) => {
          let (request, _) = req.into_parts();
          let api_error: ApiError = e.into();
          let response = HttpResponse::Unauthorized()
            .json(api_error)
            .map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      // Attach claims to request extensions
      req.extensions_mut().insert(claims);

      // Call the next service
      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.to_string())
    .ok_or(ApiError::Auth(AuthErrorKind::TokenInvalid))
}

/// Extension trait to extract validated token claims from a request
pub trait AuthClaims {
  /// Get the validated token claims from request extensions
  ///
  /// # Panics
  ///
  /// Panics if no claims are present. Only call this in handlers protected
  /// by AuthMiddleware.
  fn token_claims(&self) -> TokenClaims;
}

impl AuthClaims for actix_web::HttpRequest {
  fn token_claims(&self) -> TokenClaims {
    self
      .extensions()
      .get::<TokenClaims>()
      .cloned()
      .expect("Token claims not found in request extensions. Did you forget to add AuthMiddleware?")
  }
}
