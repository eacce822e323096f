use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use sqlx::{FromRow, PgPool};
use std::net::IpAddr;
use uuid::Uuid;

use crate::domain::auth::entities::Session;
use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::SessionRepository;

/// Database row structure for sessions table
#[derive(Debug, FromRow)]
struct SessionRow {
  id: Uuid,
  user_id: Uuid,
  session_token: String,
  ip_address: Option<String>,
  user_agent: Option<String>,
  expires_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
  fn from(row: SessionRow) -> Self {
    Session {
      id: row.id,
      user_id: row.user_id,
      session_token: row.session_token,
      ip_address: row
        .ip_address
        .and_then(|ip_str| ip_str.parse::<IpAddr>().ok()),
      user_agent: row.user_agent,
      expires_at: row.expires_at,
      created_at: row.created_at,
    }
  }
}

/// PostgreSQL implementation of the SessionRepository trait
///
/// When a Redis connection is supplied, sessions are cached under
/// `session:{token_hash}` until they expire. Cache failures are logged and
/// fall through to PostgreSQL.
pub struct PostgresSessionRepository {
  pool: PgPool,
  redis: Option<redis::aio::ConnectionManager>,
}

impl PostgresSessionRepository {
  pub fn new(pool: PgPool, redis: redis::aio::ConnectionManager) -> Self {
    Self {
      pool,
      redis: Some(redis),
    }
  }

  /// Creates a new PostgresSessionRepository without Redis caching
  pub fn without_redis(pool: PgPool) -> Self {
    Self { pool, redis: None }
  }

  fn cache_key(token_hash: &str) -> String {
    format!("session:{}", token_hash)
  }

  async fn cache_get(&self, token_hash: &str) -> Option<Session> {
    let mut conn = self.redis.clone()?;
    match conn
      .get::<_, Option<String>>(Self::cache_key(token_hash))
      .await
    {
      Ok(cached) => cached.and_then(|json| serde_json::from_str(&json).ok()),
      Err(e) => {
        tracing::warn!("Session cache read failed: {}", e);
        None
      }
    }
  }

  async fn cache_put(&self, session: &Session) {
    let Some(mut conn) = self.redis.clone() else {
      return;
    };
    let ttl = session.remaining_seconds();
    if ttl == 0 {
      return;
    }
    let Ok(json) = serde_json::to_string(session) else {
      return;
    };
    if let Err(e) = conn
      .set_ex::<_, _, ()>(Self::cache_key(&session.session_token), json, ttl)
      .await
    {
      tracing::warn!("Session cache write failed: {}", e);
    }
  }

  async fn cache_evict(&self, token_hash: &str) {
    let Some(mut conn) = self.redis.clone() else {
      return;
    };
    if let Err(e) = conn.del::<_, ()>(Self::cache_key(token_hash)).await {
      tracing::warn!("Session cache eviction failed: {}", e);
    }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    let ip_address = session.ip_address.map(|ip| ip.to_string());

    let row = sqlx::query_as::<_, SessionRow>(
      r#"
      INSERT INTO sessions (id, user_id, session_token, ip_address, user_agent, expires_at, created_at)
      VALUES ($1, $2, $3, CAST($4 AS INET), $5, $6, $7)
      RETURNING id, user_id, session_token, HOST(ip_address) as ip_address, user_agent, expires_at, created_at
      "#,
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(&session.session_token)
    .bind(ip_address.as_deref())
    .bind(session.user_agent.as_deref())
    .bind(session.expires_at)
    .bind(session.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create session: {}", e);
      AuthError::Repository(RepositoryError::QueryFailed(e.to_string()))
    })?;

    let session: Session = row.into();
    self.cache_put(&session).await;
    Ok(session)
  }

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError> {
    if let Some(session) = self.cache_get(token_hash).await {
      return Ok(Some(session));
    }

    let row = sqlx::query_as::<_, SessionRow>(
      r#"
      SELECT id, user_id, session_token, HOST(ip_address) as ip_address, user_agent, expires_at, created_at
      FROM sessions
      WHERE session_token = $1
      "#,
    )
    .bind(token_hash)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find session by token hash: {}", e);
      AuthError::Repository(RepositoryError::QueryFailed(e.to_string()))
    })?;

    let session = row.map(Session::from);
    if let Some(session) = &session {
      self.cache_put(session).await;
    }
    Ok(session)
  }

  async fn delete(&self, session: &Session) -> Result<(), AuthError> {
    self.cache_evict(&session.session_token).await;

    let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
      .bind(session.id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to delete session: {}", e);
        AuthError::Repository(RepositoryError::QueryFailed(e.to_string()))
      })?;

    if result.rows_affected() == 0 {
      tracing::warn!("Session {} not found for deletion", session.id);
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::postgres::{create_test_user, setup_test_db};
  use chrono::Duration;

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_create_and_find_session() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSessionRepository::without_redis(pool.clone());

    let user_id = create_test_user(&pool).await;
    let session = Session::with_duration(
      user_id,
      "unique_token_hash".to_string(),
      Duration::hours(1),
      Some("127.0.0.1".parse().unwrap()),
      Some("Mozilla/5.0".to_string()),
    );

    let created = repo.create(session.clone()).await.unwrap();
    assert_eq!(created.id, session.id);
    assert_eq!(created.ip_address, session.ip_address);

    let found = repo
      .find_by_token_hash("unique_token_hash")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(found.user_id, user_id);
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_delete_session() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSessionRepository::without_redis(pool.clone());

    let user_id = create_test_user(&pool).await;
    let session = Session::with_duration(
      user_id,
      "to_delete".to_string(),
      Duration::hours(1),
      None,
      None,
    );

    let created = repo.create(session).await.unwrap();
    repo.delete(&created).await.unwrap();

    assert!(repo.find_by_token_hash("to_delete").await.unwrap().is_none());
    // Deleting twice is harmless
    repo.delete(&created).await.unwrap();
  }
}
