use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::{
  entities::VerificationCode,
  errors::AuthError,
  ports::{CodeGenerator, IssuedCode, VerificationCodeStore},
};

/// PostgreSQL implementation of the VerificationCodeStore trait
///
/// Holds the acceptance window (`ttl`) and the code generator explicitly;
/// there is no hidden mutable configuration. Only SHA-256 digests of codes
/// reach the database.
pub struct PostgresVerificationCodeStore {
  pool: PgPool,
  generator: Arc<dyn CodeGenerator>,
  ttl: Duration,
}

impl PostgresVerificationCodeStore {
  /// Creates a store issuing codes valid for `ttl` from issuance
  pub fn new(pool: PgPool, generator: Arc<dyn CodeGenerator>, ttl: Duration) -> Self {
    Self {
      pool,
      generator,
      ttl,
    }
  }
}

#[async_trait]
impl VerificationCodeStore for PostgresVerificationCodeStore {
  /// Issues a fresh code, superseding any outstanding one for the user.
  ///
  /// Invalidate-then-insert runs in one transaction; together with the
  /// partial unique index on `(user_id) WHERE consumed_at IS NULL` the store
  /// guarantees no two usable codes coexist, even under concurrent issues.
  async fn issue(&self, user_id: Uuid) -> Result<IssuedCode, AuthError> {
    let code = self.generator.generate().await?;
    let row = VerificationCode::new(user_id, VerificationCode::digest(&code), self.ttl);

    let mut tx = self.pool.begin().await?;

    sqlx::query("DELETE FROM verification_codes WHERE user_id = $1 AND consumed_at IS NULL")
      .bind(user_id)
      .execute(&mut *tx)
      .await?;

    sqlx::query(
      r#"
            INSERT INTO verification_codes (id, user_id, code_hash, issued_at, expires_at, consumed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
    )
    .bind(row.id)
    .bind(row.user_id)
    .bind(&row.code_hash)
    .bind(row.issued_at)
    .bind(row.expires_at)
    .bind(row.consumed_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(IssuedCode {
      code,
      expires_at: row.expires_at,
    })
  }

  /// One-shot consume: the row is matched and marked consumed in a single
  /// statement, so a replay can never win.
  async fn consume(&self, user_id: Uuid, submitted: &str) -> Result<bool, AuthError> {
    let digest = VerificationCode::digest(submitted);

    let result = sqlx::query(
      r#"
            UPDATE verification_codes
            SET consumed_at = NOW()
            WHERE user_id = $1
              AND code_hash = $2
              AND consumed_at IS NULL
              AND expires_at > NOW()
            "#,
    )
    .bind(user_id)
    .bind(&digest)
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected() > 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::entities::User;
  use crate::domain::auth::ports::{RoleRepository, UserRepository};
  use crate::domain::auth::value_objects::RoleName;
  use crate::infrastructure::persistence::postgres::{
    PostgresRoleRepository, PostgresUserRepository,
  };
  use sqlx::postgres::PgPoolOptions;
  use std::collections::VecDeque;
  use std::sync::Mutex;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  /// Deterministic generator for tests
  struct SeqGenerator {
    codes: Mutex<VecDeque<String>>,
  }

  impl SeqGenerator {
    fn new(codes: &[&str]) -> Arc<Self> {
      Arc::new(Self {
        codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
      })
    }
  }

  #[async_trait]
  impl CodeGenerator for SeqGenerator {
    async fn generate(&self) -> Result<String, AuthError> {
      Ok(
        self
          .codes
          .lock()
          .unwrap()
          .pop_front()
          .unwrap_or_else(|| "000000".to_string()),
      )
    }
  }

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

  async fn seed_user(pool: &PgPool) -> Uuid {
    let role = PostgresRoleRepository::new(pool.clone())
      .find_or_create(RoleName::User)
      .await
      .unwrap();

    let user = User::new(
      "alice".to_string(),
      "alice@example.com".to_string(),
      "hashed_password".to_string(),
      vec![role],
    );

    PostgresUserRepository::new(pool.clone())
      .create(user)
      .await
      .unwrap()
      .id
  }

  #[tokio::test]
  async fn test_issue_then_consume() {
    let (pool, _container) = setup_test_db().await;
    let user_id = seed_user(&pool).await;

    let store = PostgresVerificationCodeStore::new(
      pool,
      SeqGenerator::new(&["123456"]),
      Duration::minutes(15),
    );

    let issued = store.issue(user_id).await.unwrap();
    assert_eq!(issued.code, "123456");
    assert!(store.consume(user_id, "123456").await.unwrap());
  }

  #[tokio::test]
  async fn test_consume_is_one_shot() {
    let (pool, _container) = setup_test_db().await;
    let user_id = seed_user(&pool).await;

    let store = PostgresVerificationCodeStore::new(
      pool,
      SeqGenerator::new(&["123456"]),
      Duration::minutes(15),
    );

    store.issue(user_id).await.unwrap();
    assert!(store.consume(user_id, "123456").await.unwrap());
    assert!(!store.consume(user_id, "123456").await.unwrap());
  }

  #[tokio::test]
  async fn test_reissue_supersedes_outstanding_code() {
    let (pool, _container) = setup_test_db().await;
    let user_id = seed_user(&pool).await;

    let store = PostgresVerificationCodeStore::new(
      pool,
      SeqGenerator::new(&["123456", "654321"]),
      Duration::minutes(15),
    );

    store.issue(user_id).await.unwrap();
    store.issue(user_id).await.unwrap();

    // The first code never expired, but it is gone
    assert!(!store.consume(user_id, "123456").await.unwrap());
    assert!(store.consume(user_id, "654321").await.unwrap());
  }

  #[tokio::test]
  async fn test_expired_code_is_rejected() {
    let (pool, _container) = setup_test_db().await;
    let user_id = seed_user(&pool).await;

    // Zero TTL: the code is already outside its window when checked
    let store =
      PostgresVerificationCodeStore::new(pool, SeqGenerator::new(&["123456"]), Duration::zero());

    store.issue(user_id).await.unwrap();
    assert!(!store.consume(user_id, "123456").await.unwrap());
  }

  #[tokio::test]
  async fn test_wrong_code_is_rejected() {
    let (pool, _container) = setup_test_db().await;
    let user_id = seed_user(&pool).await;

    let store = PostgresVerificationCodeStore::new(
      pool,
      SeqGenerator::new(&["123456"]),
      Duration::minutes(15),
    );

    store.issue(user_id).await.unwrap();
    assert!(!store.consume(user_id, "999999").await.unwrap());
  }
}
