use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::integration::{IntegrationError, SyncDispatcher, SyncLog};

#[derive(Debug, Deserialize)]
pub struct ListSyncLogsCommand {
  pub user_id: Uuid,
  pub document_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SyncLogDto {
  pub id: Uuid,
  pub document_id: Uuid,
  pub integration_id: Uuid,
  pub sync_type: String,
  pub status: String,
  pub message: String,
  pub response_data: Option<serde_json::Value>,
  pub duration_ms: i64,
  pub created_at: DateTime<Utc>,
}

impl From<SyncLog> for SyncLogDto {
  fn from(log: SyncLog) -> Self {
    Self {
      id: log.id,
      document_id: log.document_id,
      integration_id: log.integration_id,
      sync_type: log.sync_type.as_str().to_string(),
      status: log.status.as_str().to_string(),
      message: log.message,
      response_data: log.response_data,
      duration_ms: log.duration_ms,
      created_at: log.created_at,
    }
  }
}

pub struct ListSyncLogsUseCase {
  dispatcher: Arc<SyncDispatcher>,
}

impl ListSyncLogsUseCase {
  pub fn new(dispatcher: Arc<SyncDispatcher>) -> Self {
    Self { dispatcher }
  }

  pub async fn execute(
    &self,
    command: ListSyncLogsCommand,
  ) -> Result<Vec<SyncLogDto>, IntegrationError> {
    let logs = self
      .dispatcher
      .list_sync_logs(command.user_id, command.document_id)
      .await?;
    Ok(logs.into_iter().map(SyncLogDto::from).collect())
  }
}
