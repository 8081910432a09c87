use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::auth::{
  entities::Role,
  errors::{AuthError, RepositoryError},
  ports::RoleRepository,
  value_objects::RoleName,
};

/// PostgreSQL implementation of the RoleRepository trait
pub struct PostgresRoleRepository {
  pool: PgPool,
}

impl PostgresRoleRepository {
  /// Creates a new instance of PostgresRoleRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
  id: i32,
  name: String,
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
  /// Find-or-create with the unique constraint on `roles.name` as the
  /// authority: a concurrent first use loses the insert and falls through to
  /// the select.
  async fn find_or_create(&self, name: RoleName) -> Result<Role, AuthError> {
    sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
      .bind(name.as_str())
      .execute(&self.pool)
      .await?;

    let row = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE name = $1")
      .bind(name.as_str())
      .fetch_one(&self.pool)
      .await?;

    let parsed = row.name.parse::<RoleName>().map_err(|_| {
      AuthError::Repository(RepositoryError::DatabaseError(format!(
        "unknown role: {}",
        row.name
      )))
    })?;

    Ok(Role::new(row.id, parsed))
  }
}
