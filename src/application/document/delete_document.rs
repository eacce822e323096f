use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::document::{DocumentError, DocumentService};

#[derive(Debug, Deserialize)]
pub struct DeleteDocumentCommand {
  pub user_id: Uuid,
  pub document_id: Uuid,
}

/// Deletes a draft; its number stays consumed
pub struct DeleteDocumentUseCase {
  document_service: Arc<DocumentService>,
}

impl DeleteDocumentUseCase {
  pub fn new(document_service: Arc<DocumentService>) -> Self {
    Self { document_service }
  }

  pub async fn execute(&self, command: DeleteDocumentCommand) -> Result<(), DocumentError> {
    self
      .document_service
      .delete_document(command.user_id, command.document_id)
      .await
  }
}
