use std::sync::Arc;

use super::entities::{User, VerificationStatus};
use super::errors::{AuthError, RepositoryError};
use super::ports::{
  IssuedToken, NotificationGateway, PasswordHasher, RoleRepository, TokenClaims, TokenIssuer,
  UserRepository, VerificationCodeStore,
};
use super::value_objects::{Email, Password, PasswordHash, RoleName, Username};

/// Account lifecycle service implementing the core business logic
///
/// Orchestrates the user directory, role resolution, credential hashing,
/// one-time verification codes, notification delivery and bearer-token
/// issuance. Each account moves through
/// `UNREGISTERED -> PENDING_VERIFICATION -> VERIFIED`.
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  role_repo: Arc<dyn RoleRepository>,
  code_store: Arc<dyn VerificationCodeStore>,
  password_hasher: Arc<dyn PasswordHasher>,
  notifier: Arc<dyn NotificationGateway>,
  token_issuer: Arc<dyn TokenIssuer>,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    role_repo: Arc<dyn RoleRepository>,
    code_store: Arc<dyn VerificationCodeStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    notifier: Arc<dyn NotificationGateway>,
    token_issuer: Arc<dyn TokenIssuer>,
  ) -> Self {
    Self {
      user_repo,
      role_repo,
      code_store,
      password_hasher,
      notifier,
      token_issuer,
    }
  }

  /// Registers a new account pending email verification
  ///
  /// # Errors
  /// Returns `AuthError::UserAlreadyExists` if the username or email is
  /// taken. The pre-checks are advisory; a concurrent signup losing the race
  /// is still rejected when the storage constraint fires on insert.
  pub async fn sign_up(
    &self,
    username: Username,
    email: Email,
    password: Password,
  ) -> Result<User, AuthError> {
    if self.user_repo.exists_by_username(&username).await? {
      return Err(AuthError::UserAlreadyExists);
    }
    if self.user_repo.exists_by_email(&email).await? {
      return Err(AuthError::UserAlreadyExists);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    let default_role = self.role_repo.find_or_create(RoleName::User).await?;

    let user = User::new(
      username.into_inner(),
      email.as_str().to_string(),
      password_hash.into_inner(),
      vec![default_role],
    );

    let created = match self.user_repo.create(user).await {
      Ok(user) => user,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_))) => {
        return Err(AuthError::UserAlreadyExists);
      }
      Err(e) => return Err(e),
    };

    let issued = self.code_store.issue(created.id).await?;
    self.deliver_verification_code(email, issued.code);

    Ok(created)
  }

  /// Re-issues a verification code, superseding any outstanding one
  ///
  /// # Errors
  /// `UserNotFound` if no account uses the email; `AlreadyVerified` if the
  /// account no longer needs verification.
  pub async fn resend_verification(&self, email: Email) -> Result<(), AuthError> {
    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    if user.status == VerificationStatus::Verified {
      return Err(AuthError::AlreadyVerified);
    }

    let issued = self.code_store.issue(user.id).await?;
    self.deliver_verification_code(email, issued.code);

    Ok(())
  }

  /// Consumes a verification code and activates the account
  ///
  /// # Errors
  /// `UserNotFound` if no account uses the email; `VerificationFailed` if
  /// the code is wrong, expired or already used. Both are recoverable by
  /// requesting a resend.
  pub async fn verify_email(&self, email: Email, code: &str) -> Result<User, AuthError> {
    let mut user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    if !self.code_store.consume(user.id, code).await? {
      return Err(AuthError::VerificationFailed);
    }

    user.mark_verified();
    self.user_repo.update(user).await
  }

  /// Authenticates credentials and issues a bearer token
  ///
  /// Unknown email, unverified/disabled account and wrong password all
  /// collapse into `InvalidCredentials` so the response does not reveal
  /// which case occurred. The issued token carries the roles the user holds
  /// right now.
  pub async fn sign_in(
    &self,
    email: Email,
    password: Password,
  ) -> Result<(User, IssuedToken), AuthError> {
    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    if !user.is_active() {
      return Err(AuthError::InvalidCredentials);
    }

    // A malformed stored hash reads as a failed verification, not a
    // distinguishable server error.
    let stored = PasswordHash::from_hash(user.password_hash.as_str())
      .map_err(|_| AuthError::InvalidCredentials)?;

    if !self.password_hasher.verify(&password, &stored).await? {
      return Err(AuthError::InvalidCredentials);
    }

    let token = self.token_issuer.issue(user.id, &user.role_names())?;

    Ok((user, token))
  }

  /// Replaces the password after confirming the current one
  ///
  /// Nothing is mutated before both checks pass. Outstanding bearer tokens
  /// stay valid until their embedded expiry.
  pub async fn reset_password(
    &self,
    email: Email,
    current_password: Password,
    new_password: Password,
  ) -> Result<(), AuthError> {
    let mut user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    let stored = PasswordHash::from_hash(user.password_hash.as_str())
      .map_err(|_| AuthError::InvalidCredentials)?;

    if !self.password_hasher.verify(&current_password, &stored).await? {
      return Err(AuthError::InvalidCredentials);
    }

    let new_hash = self.password_hasher.hash(&new_password).await?;
    user.update_password(new_hash.into_inner());
    self.user_repo.update(user).await?;

    self.notify_password_reset(email);

    Ok(())
  }

  /// Validates a bearer token and returns its claims (no store lookup)
  pub fn authenticate(&self, token: &str) -> Result<TokenClaims, AuthError> {
    self.token_issuer.validate(token)
  }

  /// Validates a bearer token and loads the asserted user
  pub async fn current_user(&self, token: &str) -> Result<User, AuthError> {
    let claims = self.token_issuer.validate(token)?;

    self
      .user_repo
      .find_by_id(claims.user_id)
      .await?
      .ok_or(AuthError::UserNotFound)
  }

  // Delivery runs detached from the request path: a failed send is visible
  // in logs only and never rolls back the originating operation.
  fn deliver_verification_code(&self, email: Email, code: String) {
    let notifier = Arc::clone(&self.notifier);
    tokio::spawn(async move {
      if let Err(e) = notifier.send_verification_code(&email, &code).await {
        tracing::warn!(email = %email, error = %e, "failed to deliver verification code");
      }
    });
  }

  fn notify_password_reset(&self, email: Email) {
    let notifier = Arc::clone(&self.notifier);
    tokio::spawn(async move {
      if let Err(e) = notifier.send_password_reset_notice(&email).await {
        tracing::warn!(email = %email, error = %e, "failed to deliver password reset notice");
      }
    });
  }
}
