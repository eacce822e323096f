use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::AuthError,
  ports::UserRepository,
  value_objects::{Bin, Email},
};

const USER_COLUMNS: &str =
  "id, bin_number, email, password_hash, is_verified, is_staff, created_at, updated_at";

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {} FROM users WHERE {} = $1",
      USER_COLUMNS, column
    ))
    .bind(value)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  bin_number: String,
  email: String,
  password_hash: String,
  is_verified: bool,
  is_staff: bool,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User {
      id: row.id,
      bin_number: row.bin_number,
      email: row.email,
      password_hash: row.password_hash,
      is_verified: row.is_verified,
      is_staff: row.is_staff,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      r#"
      INSERT INTO users (id, bin_number, email, password_hash, is_verified, is_staff, created_at, updated_at)
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
      RETURNING {}
      "#,
      USER_COLUMNS
    ))
    .bind(user.id)
    .bind(&user.bin_number)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_verified)
    .bind(user.is_staff)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {} FROM users WHERE id = $1",
      USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn find_by_bin(&self, bin: &Bin) -> Result<Option<User>, AuthError> {
    self.find_one("bin_number", bin.as_str()).await
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    self.find_one("email", email.as_str()).await
  }
}
