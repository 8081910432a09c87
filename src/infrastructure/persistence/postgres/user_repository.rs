use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{Role, User, VerificationStatus},
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::{Email, RoleName, Username},
};

/// PostgreSQL implementation of the UserRepository trait
///
/// Unique constraints on `users.username` and `users.email` are the final
/// authority on uniqueness; application-level pre-checks only shortcut the
/// common case.
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn load_roles(&self, user_id: Uuid) -> Result<Vec<Role>, AuthError> {
    let rows = sqlx::query_as::<_, RoleRow>(
      r#"
            SELECT r.id, r.name
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Role::try_from).collect()
  }

  async fn find_row(&self, column: &str, value: &str) -> Result<Option<User>, AuthError> {
    // column is a compile-time constant chosen below, never user input
    let query = format!(
      "SELECT id, username, email, password_hash, enabled, status, created_at, updated_at \
       FROM users WHERE {} = $1",
      column
    );

    let row = sqlx::query_as::<_, UserRow>(&query)
      .bind(value)
      .fetch_optional(&self.pool)
      .await?;

    match row {
      Some(row) => {
        let roles = self.load_roles(row.id).await?;
        Ok(Some(row.into_user(roles)?))
      }
      None => Ok(None),
    }
  }
}

/// Database row structure for the users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  username: String,
  email: String,
  password_hash: String,
  enabled: bool,
  status: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl UserRow {
  fn into_user(self, roles: Vec<Role>) -> Result<User, AuthError> {
    let status = VerificationStatus::parse(&self.status).ok_or_else(|| {
      AuthError::Repository(RepositoryError::DatabaseError(format!(
        "unknown verification status: {}",
        self.status
      )))
    })?;

    Ok(User::from_db(
      self.id,
      self.username,
      self.email,
      self.password_hash,
      self.enabled,
      status,
      roles,
      self.created_at,
      self.updated_at,
    ))
  }
}

/// Database row structure for the roles table
#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
  id: i32,
  name: String,
}

impl TryFrom<RoleRow> for Role {
  type Error = AuthError;

  fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
    let name = row.name.parse::<RoleName>().map_err(|_| {
      AuthError::Repository(RepositoryError::DatabaseError(format!(
        "unknown role: {}",
        row.name
      )))
    })?;

    Ok(Role::new(row.id, name))
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut tx = self.pool.begin().await?;

    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (
                id,
                username,
                email,
                password_hash,
                enabled,
                status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id,
                username,
                email,
                password_hash,
                enabled,
                status,
                created_at,
                updated_at
            "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.enabled)
    .bind(user.status.as_str())
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&mut *tx)
    .await?;

    for role in &user.roles {
      sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
        .bind(user.id)
        .bind(role.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    row.into_user(user.roles)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, username, email, password_hash, enabled, status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    match row {
      Some(row) => {
        let roles = self.load_roles(row.id).await?;
        Ok(Some(row.into_user(roles)?))
      }
      None => Ok(None),
    }
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    self.find_row("email", email.as_str()).await
  }

  async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
    self.find_row("username", username.as_str()).await
  }

  async fn exists_by_email(&self, email: &Email) -> Result<bool, AuthError> {
    let exists: bool =
      sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

    Ok(exists)
  }

  async fn exists_by_username(&self, username: &Username) -> Result<bool, AuthError> {
    let exists: bool =
      sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await?;

    Ok(exists)
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET
                username = $2,
                email = $3,
                password_hash = $4,
                enabled = $5,
                status = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING
                id,
                username,
                email,
                password_hash,
                enabled,
                status,
                created_at,
                updated_at
            "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.enabled)
    .bind(user.status.as_str())
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => row.into_user(user.roles),
      Err(sqlx::Error::RowNotFound) => Err(AuthError::Repository(RepositoryError::NotFound)),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        Err(AuthError::UserAlreadyExists)
      }
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::PostgresRoleRepository;
  use crate::domain::auth::ports::RoleRepository;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  async fn pending_user(pool: &PgPool, username: &str, email: &str) -> User {
    let role = PostgresRoleRepository::new(pool.clone())
      .find_or_create(RoleName::User)
      .await
      .unwrap();

    User::new(
      username.to_string(),
      email.to_string(),
      "hashed_password".to_string(),
      vec![role],
    )
  }

  #[tokio::test]
  async fn test_create_and_find_by_email_loads_roles() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool.clone());

    let user = pending_user(&pool, "alice", "alice@example.com").await;
    repo.create(user).await.unwrap();

    let email = Email::new("alice@example.com").unwrap();
    let found = repo.find_by_email(&email).await.unwrap().unwrap();

    assert_eq!(found.username, "alice");
    assert!(!found.enabled);
    assert_eq!(found.status, VerificationStatus::Pending);
    assert_eq!(found.role_names(), vec![RoleName::User]);
  }

  #[tokio::test]
  async fn test_duplicate_email_is_rejected_by_constraint() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool.clone());

    let first = pending_user(&pool, "alice", "duplicate@example.com").await;
    let second = pending_user(&pool, "alice2", "duplicate@example.com").await;

    repo.create(first).await.unwrap();
    let result = repo.create(second).await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_)))
    ));
  }

  #[tokio::test]
  async fn test_duplicate_username_is_rejected_by_constraint() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool.clone());

    let first = pending_user(&pool, "alice", "one@example.com").await;
    let second = pending_user(&pool, "alice", "two@example.com").await;

    repo.create(first).await.unwrap();
    let result = repo.create(second).await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_)))
    ));
  }

  #[tokio::test]
  async fn test_exists_checks() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool.clone());

    let user = pending_user(&pool, "bob", "bob@example.com").await;
    repo.create(user).await.unwrap();

    let email = Email::new("bob@example.com").unwrap();
    let username = Username::new("bob").unwrap();
    assert!(repo.exists_by_email(&email).await.unwrap());
    assert!(repo.exists_by_username(&username).await.unwrap());

    let missing = Email::new("nobody@example.com").unwrap();
    assert!(!repo.exists_by_email(&missing).await.unwrap());
  }

  #[tokio::test]
  async fn test_update_persists_verification() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool.clone());

    let user = pending_user(&pool, "carol", "carol@example.com").await;
    let mut created = repo.create(user).await.unwrap();

    created.mark_verified();
    repo.update(created.clone()).await.unwrap();

    let reloaded = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert!(reloaded.enabled);
    assert_eq!(reloaded.status, VerificationStatus::Verified);
  }
}
