use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::integration::{IntegrationError, SyncDispatcher};

#[derive(Debug, Deserialize)]
pub struct ExportDocumentCommand {
  pub user_id: Uuid,
  pub document_id: Uuid,
  /// Falls back to the first active integration
  pub integration_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ExportDocumentResponse {
  pub document_id: Uuid,
  pub document_number: String,
  pub document_status: String,
  pub sync_status: String,
  pub message: String,
  pub external_id: Option<String>,
  pub file_path: Option<String>,
  pub sync_log_id: Uuid,
  pub duration_ms: i64,
}

pub struct ExportDocumentUseCase {
  dispatcher: Arc<SyncDispatcher>,
}

impl ExportDocumentUseCase {
  pub fn new(dispatcher: Arc<SyncDispatcher>) -> Self {
    Self { dispatcher }
  }

  pub async fn execute(
    &self,
    command: ExportDocumentCommand,
  ) -> Result<ExportDocumentResponse, IntegrationError> {
    let outcome = self
      .dispatcher
      .export_document(command.user_id, command.document_id, command.integration_id)
      .await?;

    Ok(ExportDocumentResponse {
      document_id: outcome.document.id,
      document_number: outcome.document.document_number.into_inner(),
      document_status: outcome.document.status.as_str().to_string(),
      sync_status: outcome.receipt.status.as_str().to_string(),
      message: outcome.receipt.message,
      external_id: outcome.document.external_id,
      file_path: outcome.receipt.file_path,
      sync_log_id: outcome.log.id,
      duration_ms: outcome.log.duration_ms,
    })
  }
}
