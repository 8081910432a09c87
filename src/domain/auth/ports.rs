use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entities::{Role, User};
use super::errors::{AuthError, NotificationError};
use super::value_objects::{Email, Password, PasswordHash, RoleName, Username};

/// Repository trait for user persistence operations
///
/// The storage layer is the authority on username/email uniqueness; the
/// `exists_*` checks are advisory pre-checks and `create` must still reject
/// a concurrent duplicate with a `DuplicateKey` repository error.
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user in the repository
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

  /// Finds a user by their username
  async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;

  /// Checks whether a user with the given email exists
  async fn exists_by_email(&self, email: &Email) -> Result<bool, AuthError>;

  /// Checks whether a user with the given username exists
  async fn exists_by_username(&self, username: &Username) -> Result<bool, AuthError>;

  /// Updates an existing user
  async fn update(&self, user: User) -> Result<User, AuthError>;
}

/// Repository trait for role lookup with lazy creation
#[async_trait]
pub trait RoleRepository: Send + Sync {
  /// Returns the canonical role record for `name`, creating it on first use.
  ///
  /// Concurrent first use must not produce duplicate rows; implementations
  /// resolve races through the storage layer's uniqueness constraint.
  async fn find_or_create(&self, name: RoleName) -> Result<Role, AuthError>;
}

/// A freshly issued verification code, carrying the plaintext for delivery
#[derive(Debug, Clone)]
pub struct IssuedCode {
  /// Plaintext code value to deliver to the user
  pub code: String,
  /// Timestamp when the code stops being accepted
  pub expires_at: DateTime<Utc>,
}

/// Store for one-time email verification codes
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
  /// Generates and persists a new code for the user, superseding any
  /// outstanding one, and returns the plaintext for delivery
  async fn issue(&self, user_id: Uuid) -> Result<IssuedCode, AuthError>;

  /// Consumes a matching, unconsumed, unexpired code.
  ///
  /// Returns `true` and marks the code consumed on success; `false` on
  /// mismatch, expiry or replay.
  async fn consume(&self, user_id: Uuid, submitted: &str) -> Result<bool, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}

/// Service trait for random verification-code generation
#[async_trait]
pub trait CodeGenerator: Send + Sync {
  /// Generates a cryptographically random fixed-length code
  async fn generate(&self) -> Result<String, AuthError>;
}

/// Outbound gateway for account emails
///
/// Callers treat delivery as fire-and-forget; errors are logged, never
/// propagated.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
  /// Delivers a verification code to the given address
  async fn send_verification_code(
    &self,
    email: &Email,
    code: &str,
  ) -> Result<(), NotificationError>;

  /// Notifies the given address that its password was changed
  async fn send_password_reset_notice(&self, email: &Email) -> Result<(), NotificationError>;
}

/// A signed bearer token together with its embedded expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
  /// Encoded token value
  pub token: String,
  /// Timestamp when the token stops validating
  pub expires_at: DateTime<Utc>,
}

/// Claims recovered from a validated bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
  /// Identity the token asserts
  pub user_id: Uuid,
  /// Roles held at issuance time (not re-checked live)
  pub roles: Vec<RoleName>,
  /// Embedded expiry
  pub expires_at: DateTime<Utc>,
}

/// Issuer and validator of self-verifying bearer tokens
///
/// Both operations are pure computation: validation requires no store
/// lookup.
pub trait TokenIssuer: Send + Sync {
  /// Mints a signed token asserting `user_id` and its current roles
  fn issue(&self, user_id: Uuid, roles: &[RoleName]) -> Result<IssuedToken, AuthError>;

  /// Validates a token, failing with `TokenExpired` or `TokenInvalid`
  fn validate(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
