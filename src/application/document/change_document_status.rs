use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::document::{DocumentError, DocumentService, DocumentStatus};

#[derive(Debug, Deserialize)]
pub struct ChangeDocumentStatusCommand {
  pub user_id: Uuid,
  pub document_id: Uuid,
  pub new_status: String,
}

#[derive(Debug, Serialize)]
pub struct ChangeDocumentStatusResponse {
  pub document_id: Uuid,
  pub status: String,
}

pub struct ChangeDocumentStatusUseCase {
  document_service: Arc<DocumentService>,
}

impl ChangeDocumentStatusUseCase {
  pub fn new(document_service: Arc<DocumentService>) -> Self {
    Self { document_service }
  }

  pub async fn execute(
    &self,
    command: ChangeDocumentStatusCommand,
  ) -> Result<ChangeDocumentStatusResponse, DocumentError> {
    let new_status = DocumentStatus::from_str(&command.new_status)?;

    let document = self
      .document_service
      .change_document_status(command.user_id, command.document_id, new_status)
      .await?;

    Ok(ChangeDocumentStatusResponse {
      document_id: document.id,
      status: document.status.as_str().to_string(),
    })
  }
}
