use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::integration::{
  Integration, IntegrationError, IntegrationRepository, SyncLog, SyncLogRepository,
};

#[derive(Debug, FromRow)]
struct IntegrationRow {
  id: Uuid,
  name: String,
  integration_type: String,
  endpoint_url: Option<String>,
  username: String,
  password_encrypted: String,
  export_path: String,
  import_path: String,
  file_format: String,
  auto_sync: bool,
  sync_interval_minutes: i32,
  last_sync: Option<DateTime<Utc>>,
  is_active: bool,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<IntegrationRow> for Integration {
  type Error = IntegrationError;

  fn try_from(row: IntegrationRow) -> Result<Self, Self::Error> {
    Ok(Integration {
      id: row.id,
      name: row.name,
      integration_type: row.integration_type.parse()?,
      endpoint_url: row.endpoint_url,
      username: row.username,
      password_encrypted: row.password_encrypted,
      export_path: row.export_path,
      import_path: row.import_path,
      file_format: row.file_format.parse()?,
      auto_sync: row.auto_sync,
      sync_interval_minutes: row.sync_interval_minutes,
      last_sync: row.last_sync,
      is_active: row.is_active,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct SyncLogRow {
  id: Uuid,
  document_id: Uuid,
  integration_id: Uuid,
  sync_type: String,
  status: String,
  message: String,
  response_data: Option<serde_json::Value>,
  duration_ms: i64,
  created_at: DateTime<Utc>,
}

impl TryFrom<SyncLogRow> for SyncLog {
  type Error = IntegrationError;

  fn try_from(row: SyncLogRow) -> Result<Self, Self::Error> {
    Ok(SyncLog {
      id: row.id,
      document_id: row.document_id,
      integration_id: row.integration_id,
      sync_type: row.sync_type.parse()?,
      status: row.status.parse()?,
      message: row.message,
      response_data: row.response_data,
      duration_ms: row.duration_ms,
      created_at: row.created_at,
    })
  }
}

const INTEGRATION_COLUMNS: &str = "id, name, integration_type, endpoint_url, username, \
  password_encrypted, export_path, import_path, file_format, auto_sync, sync_interval_minutes, \
  last_sync, is_active, created_at, updated_at";

pub struct PostgresIntegrationRepository {
  pool: PgPool,
}

impl PostgresIntegrationRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl IntegrationRepository for PostgresIntegrationRepository {
  async fn create(&self, integration: Integration) -> Result<Integration, IntegrationError> {
    let row = sqlx::query_as::<_, IntegrationRow>(&format!(
      r#"
      INSERT INTO onec_integrations (
          id, name, integration_type, endpoint_url, username, password_encrypted, export_path,
          import_path, file_format, auto_sync, sync_interval_minutes, last_sync, is_active,
          created_at, updated_at
      )
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
      RETURNING {}
      "#,
      INTEGRATION_COLUMNS
    ))
    .bind(integration.id)
    .bind(&integration.name)
    .bind(integration.integration_type.as_str())
    .bind(integration.endpoint_url.as_deref())
    .bind(&integration.username)
    .bind(&integration.password_encrypted)
    .bind(&integration.export_path)
    .bind(&integration.import_path)
    .bind(integration.file_format.as_str())
    .bind(integration.auto_sync)
    .bind(integration.sync_interval_minutes)
    .bind(integration.last_sync)
    .bind(integration.is_active)
    .bind(integration.created_at)
    .bind(integration.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, integration: &Integration) -> Result<(), IntegrationError> {
    let result = sqlx::query(
      r#"
      UPDATE onec_integrations
      SET name = $2, integration_type = $3, endpoint_url = $4, username = $5,
          password_encrypted = $6, export_path = $7, import_path = $8, file_format = $9,
          auto_sync = $10, sync_interval_minutes = $11, is_active = $12, updated_at = $13
      WHERE id = $1
      "#,
    )
    .bind(integration.id)
    .bind(&integration.name)
    .bind(integration.integration_type.as_str())
    .bind(integration.endpoint_url.as_deref())
    .bind(&integration.username)
    .bind(&integration.password_encrypted)
    .bind(&integration.export_path)
    .bind(&integration.import_path)
    .bind(integration.file_format.as_str())
    .bind(integration.auto_sync)
    .bind(integration.sync_interval_minutes)
    .bind(integration.is_active)
    .bind(integration.updated_at)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(IntegrationError::IntegrationNotFound(integration.id));
    }
    Ok(())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Integration>, IntegrationError> {
    let row = sqlx::query_as::<_, IntegrationRow>(&format!(
      "SELECT {} FROM onec_integrations WHERE id = $1",
      INTEGRATION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(&self) -> Result<Vec<Integration>, IntegrationError> {
    let rows = sqlx::query_as::<_, IntegrationRow>(&format!(
      "SELECT {} FROM onec_integrations ORDER BY created_at ASC",
      INTEGRATION_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn find_first_active(&self) -> Result<Option<Integration>, IntegrationError> {
    let row = sqlx::query_as::<_, IntegrationRow>(&format!(
      "SELECT {} FROM onec_integrations WHERE is_active ORDER BY created_at ASC LIMIT 1",
      INTEGRATION_COLUMNS
    ))
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn delete(&self, id: Uuid) -> Result<(), IntegrationError> {
    let result = sqlx::query("DELETE FROM onec_integrations WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await;

    match result {
      Ok(done) if done.rows_affected() == 0 => Err(IntegrationError::IntegrationNotFound(id)),
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => Err(
        IntegrationError::CannotDelete("integration has sync history".to_string()),
      ),
      Err(e) => Err(e.into()),
    }
  }

  async fn touch_last_sync(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), IntegrationError> {
    sqlx::query("UPDATE onec_integrations SET last_sync = $2 WHERE id = $1")
      .bind(id)
      .bind(at)
      .execute(&self.pool)
      .await?;

    Ok(())
  }
}

/// Writes are INSERT-only; a trigger rejects UPDATE and DELETE on the table
pub struct PostgresSyncLogRepository {
  pool: PgPool,
}

impl PostgresSyncLogRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SyncLogRepository for PostgresSyncLogRepository {
  async fn append(&self, log: SyncLog) -> Result<SyncLog, IntegrationError> {
    let row = sqlx::query_as::<_, SyncLogRow>(
      r#"
      INSERT INTO document_sync_logs (
          id, document_id, integration_id, sync_type, status, message, response_data,
          duration_ms, created_at
      )
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
      RETURNING id, document_id, integration_id, sync_type, status, message, response_data,
          duration_ms, created_at
      "#,
    )
    .bind(log.id)
    .bind(log.document_id)
    .bind(log.integration_id)
    .bind(log.sync_type.as_str())
    .bind(log.status.as_str())
    .bind(&log.message)
    .bind(&log.response_data)
    .bind(log.duration_ms)
    .bind(log.created_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn list_for_owner(
    &self,
    owner_id: Uuid,
    document_id: Option<Uuid>,
    limit: i64,
  ) -> Result<Vec<SyncLog>, IntegrationError> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
      r#"
      SELECT l.id, l.document_id, l.integration_id, l.sync_type, l.status, l.message,
          l.response_data, l.duration_ms, l.created_at
      FROM document_sync_logs l
      JOIN business_documents d ON d.id = l.document_id
      WHERE d.owner_id = "#,
    );
    query.push_bind(owner_id);

    if let Some(document_id) = document_id {
      query.push(" AND l.document_id = ").push_bind(document_id);
    }
    query
      .push(" ORDER BY l.created_at DESC LIMIT ")
      .push_bind(limit);

    let rows = query
      .build_query_as::<SyncLogRow>()
      .fetch_all(&self.pool)
      .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
