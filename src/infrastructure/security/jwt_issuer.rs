use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{IssuedToken, TokenClaims, TokenIssuer};
use crate::domain::auth::value_objects::RoleName;

/// HS256 bearer-token issuer
///
/// Tokens are self-verifying: signature plus embedded expiry, no store
/// lookup. The role set is captured at issuance time.
pub struct JwtTokenIssuer {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  ttl: Duration,
}

/// Wire format of the token claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  /// Subject (user id)
  sub: String,
  /// Role names held at issuance
  roles: Vec<RoleName>,
  /// Issued at (Unix timestamp)
  iat: i64,
  /// Expiration time (Unix timestamp)
  exp: i64,
}

impl JwtTokenIssuer {
  /// Creates an issuer signing with `secret` and stamping `ttl` lifetimes
  pub fn new(secret: &str, ttl: Duration) -> Self {
    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      ttl,
    }
  }
}

impl TokenIssuer for JwtTokenIssuer {
  fn issue(&self, user_id: Uuid, roles: &[RoleName]) -> Result<IssuedToken, AuthError> {
    let now = Utc::now();
    let expires_at = now + self.ttl;

    let claims = Claims {
      sub: user_id.to_string(),
      roles: roles.to_vec(),
      iat: now.timestamp(),
      exp: expires_at.timestamp(),
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

    Ok(IssuedToken { token, expires_at })
  }

  fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // The embedded expiry is exact; no acceptance window past it
    validation.leeway = 0;

    let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
      match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
      }
    })?;

    let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::TokenInvalid)?;
    let expires_at =
      DateTime::<Utc>::from_timestamp(data.claims.exp, 0).ok_or(AuthError::TokenInvalid)?;

    Ok(TokenClaims {
      user_id,
      roles: data.claims.roles,
      expires_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn issuer() -> JwtTokenIssuer {
    JwtTokenIssuer::new("test-secret", Duration::hours(1))
  }

  #[test]
  fn test_issue_validate_round_trip() {
    let issuer = issuer();
    let user_id = Uuid::new_v4();

    let issued = issuer
      .issue(user_id, &[RoleName::User, RoleName::Admin])
      .unwrap();
    let claims = issuer.validate(&issued.token).unwrap();

    assert_eq!(claims.user_id, user_id);
    assert_eq!(claims.roles, vec![RoleName::User, RoleName::Admin]);
    assert_eq!(claims.expires_at.timestamp(), issued.expires_at.timestamp());
  }

  #[test]
  fn test_expired_token_is_reported_as_expired() {
    // Negative TTL stamps an expiry in the past
    let issuer = JwtTokenIssuer::new("test-secret", Duration::seconds(-60));
    let issued = issuer.issue(Uuid::new_v4(), &[RoleName::User]).unwrap();

    let result = issuer.validate(&issued.token);
    assert!(matches!(result, Err(AuthError::TokenExpired)));
  }

  #[test]
  fn test_garbage_token_is_invalid() {
    let result = issuer().validate("not-a-token");
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
  }

  #[test]
  fn test_token_signed_with_other_secret_is_invalid() {
    let other = JwtTokenIssuer::new("other-secret", Duration::hours(1));
    let issued = other.issue(Uuid::new_v4(), &[RoleName::User]).unwrap();

    let result = issuer().validate(&issued.token);
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
  }

  #[test]
  fn test_tampered_token_is_invalid() {
    let issuer = issuer();
    let issued = issuer.issue(Uuid::new_v4(), &[RoleName::User]).unwrap();

    let mut tampered = issued.token.clone();
    tampered.pop();

    let result = issuer.validate(&tampered);
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
  }
}
