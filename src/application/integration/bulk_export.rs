use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::integration::{BulkExportResult, IntegrationError, SyncDispatcher};

#[derive(Debug, Deserialize)]
pub struct BulkExportCommand {
  pub user_id: Uuid,
  pub document_ids: Vec<Uuid>,
  pub integration_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BulkExportResponse {
  pub total: usize,
  pub succeeded: usize,
  pub failed: usize,
  pub results: Vec<BulkExportResult>,
}

pub struct BulkExportUseCase {
  dispatcher: Arc<SyncDispatcher>,
}

impl BulkExportUseCase {
  pub fn new(dispatcher: Arc<SyncDispatcher>) -> Self {
    Self { dispatcher }
  }

  pub async fn execute(
    &self,
    command: BulkExportCommand,
  ) -> Result<BulkExportResponse, IntegrationError> {
    let results = self
      .dispatcher
      .bulk_export(
        command.user_id,
        &command.document_ids,
        command.integration_id,
      )
      .await?;

    let succeeded = results.iter().filter(|r| r.success).count();
    Ok(BulkExportResponse {
      total: results.len(),
      succeeded,
      failed: results.len() - succeeded,
      results,
    })
  }
}
