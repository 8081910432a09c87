use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::value_objects::RoleName;

/// Verification state of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
  Pending,
  Verified,
}

impl VerificationStatus {
  /// Returns the status as its stored string form
  pub fn as_str(&self) -> &'static str {
    match self {
      VerificationStatus::Pending => "PENDING",
      VerificationStatus::Verified => "VERIFIED",
    }
  }

  /// Parses a stored string form back into a status
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "PENDING" => Some(VerificationStatus::Pending),
      "VERIFIED" => Some(VerificationStatus::Verified),
      _ => None,
    }
  }
}

/// Role entity: a named permission grouping referenced by users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
  /// Database identifier of the role
  pub id: i32,
  /// Canonical role name
  pub name: RoleName,
}

impl Role {
  pub fn new(id: i32, name: RoleName) -> Self {
    Self { id, name }
  }
}

/// User entity representing an account in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: Uuid,
  /// User's login name (unique)
  pub username: String,
  /// User's email address (unique)
  pub email: String,
  /// Hashed password using Argon2
  pub password_hash: String,
  /// Whether the account may sign in
  pub enabled: bool,
  /// Email verification state
  pub status: VerificationStatus,
  /// Roles assigned to the user
  pub roles: Vec<Role>,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Timestamp when the user was last updated
  pub updated_at: DateTime<Utc>,
}

impl User {
  /// Creates a new user pending email verification
  pub fn new(username: String, email: String, password_hash: String, roles: Vec<Role>) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      username,
      email,
      password_hash,
      enabled: false,
      status: VerificationStatus::Pending,
      roles,
      created_at: now,
      updated_at: now,
    }
  }

  /// Creates a user from database fields (for reconstruction)
  #[allow(clippy::too_many_arguments)]
  pub fn from_db(
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    enabled: bool,
    status: VerificationStatus,
    roles: Vec<Role>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      username,
      email,
      password_hash,
      enabled,
      status,
      roles,
      created_at,
      updated_at,
    }
  }

  /// Marks the account as verified and enables sign-in
  pub fn mark_verified(&mut self) {
    self.status = VerificationStatus::Verified;
    self.enabled = true;
    self.updated_at = Utc::now();
  }

  /// Replaces the stored password hash
  pub fn update_password(&mut self, new_password_hash: String) {
    self.password_hash = new_password_hash;
    self.updated_at = Utc::now();
  }

  /// Whether the account is verified and enabled
  pub fn is_active(&self) -> bool {
    self.enabled && self.status == VerificationStatus::Verified
  }

  /// Names of the roles the user currently holds
  pub fn role_names(&self) -> Vec<RoleName> {
    self.roles.iter().map(|r| r.name).collect()
  }
}

/// One-time email verification code
///
/// Only the SHA-256 digest of the code is kept; the plaintext exists solely
/// in the delivery path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCode {
  /// Unique identifier for the code row
  pub id: Uuid,
  /// User the code belongs to
  pub user_id: Uuid,
  /// SHA-256 hex digest of the code value
  pub code_hash: String,
  /// Timestamp when the code was issued
  pub issued_at: DateTime<Utc>,
  /// Timestamp when the code expires
  pub expires_at: DateTime<Utc>,
  /// Timestamp when the code was consumed, if ever
  pub consumed_at: Option<DateTime<Utc>>,
}

impl VerificationCode {
  /// Creates a new code valid for `ttl` from now
  pub fn new(user_id: Uuid, code_hash: String, ttl: Duration) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      code_hash,
      issued_at: now,
      expires_at: now + ttl,
      consumed_at: None,
    }
  }

  /// Creates a code from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    user_id: Uuid,
    code_hash: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    consumed_at: Option<DateTime<Utc>>,
  ) -> Self {
    Self {
      id,
      user_id,
      code_hash,
      issued_at,
      expires_at,
      consumed_at,
    }
  }

  /// Computes the storage digest of a plaintext code
  pub fn digest(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
  }

  /// Checks whether a submitted plaintext code matches this row
  pub fn matches(&self, submitted: &str) -> bool {
    self.code_hash == Self::digest(submitted)
  }

  /// Checks if the code has expired
  pub fn is_expired(&self) -> bool {
    self.expires_at <= Utc::now()
  }

  /// Checks if the code has been consumed
  pub fn is_consumed(&self) -> bool {
    self.consumed_at.is_some()
  }

  /// Checks if the code is still usable (not expired, not consumed)
  pub fn is_valid(&self) -> bool {
    !self.is_expired() && !self.is_consumed()
  }

  /// Marks the code as consumed
  pub fn consume(&mut self) {
    self.consumed_at = Some(Utc::now());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn role_user() -> Role {
    Role::new(1, RoleName::User)
  }

  #[test]
  fn test_new_user_starts_pending_and_disabled() {
    let user = User::new(
      "alice".to_string(),
      "alice@example.com".to_string(),
      "hashed_password".to_string(),
      vec![role_user()],
    );

    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert!(!user.enabled);
    assert_eq!(user.status, VerificationStatus::Pending);
    assert!(!user.is_active());
    assert_eq!(user.role_names(), vec![RoleName::User]);
  }

  #[test]
  fn test_mark_verified_enables_account() {
    let mut user = User::new(
      "alice".to_string(),
      "alice@example.com".to_string(),
      "hashed_password".to_string(),
      vec![role_user()],
    );

    user.mark_verified();

    assert!(user.enabled);
    assert_eq!(user.status, VerificationStatus::Verified);
    assert!(user.is_active());
  }

  #[test]
  fn test_update_password_replaces_hash() {
    let mut user = User::new(
      "alice".to_string(),
      "alice@example.com".to_string(),
      "old_hash".to_string(),
      vec![role_user()],
    );

    user.update_password("new_hash".to_string());
    assert_eq!(user.password_hash, "new_hash");
  }

  #[test]
  fn test_verification_status_round_trip() {
    assert_eq!(VerificationStatus::parse("PENDING"), Some(VerificationStatus::Pending));
    assert_eq!(
      VerificationStatus::parse(VerificationStatus::Verified.as_str()),
      Some(VerificationStatus::Verified)
    );
    assert_eq!(VerificationStatus::parse("UNKNOWN"), None);
  }

  #[test]
  fn test_verification_code_matches_digest() {
    let code = VerificationCode::new(
      Uuid::new_v4(),
      VerificationCode::digest("123456"),
      Duration::minutes(15),
    );

    assert!(code.matches("123456"));
    assert!(!code.matches("654321"));
    assert!(code.is_valid());
  }

  #[test]
  fn test_verification_code_expiry() {
    let mut code = VerificationCode::new(
      Uuid::new_v4(),
      VerificationCode::digest("123456"),
      Duration::minutes(15),
    );
    code.expires_at = Utc::now() - Duration::seconds(1);

    assert!(code.is_expired());
    assert!(!code.is_valid());
  }

  #[test]
  fn test_verification_code_consume_is_one_shot() {
    let mut code = VerificationCode::new(
      Uuid::new_v4(),
      VerificationCode::digest("123456"),
      Duration::minutes(15),
    );

    assert!(!code.is_consumed());
    code.consume();
    assert!(code.is_consumed());
    assert!(!code.is_valid());
  }
}
