use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::get_document::DocumentDto;
use crate::domain::document::{DocumentError, DocumentService};

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentCommand {
  pub user_id: Uuid,
  pub document_id: Uuid,
  pub due_date: Option<NaiveDate>,
  pub notes: String,
}

pub struct UpdateDocumentUseCase {
  document_service: Arc<DocumentService>,
}

impl UpdateDocumentUseCase {
  pub fn new(document_service: Arc<DocumentService>) -> Self {
    Self { document_service }
  }

  pub async fn execute(&self, command: UpdateDocumentCommand) -> Result<DocumentDto, DocumentError> {
    let document = self
      .document_service
      .update_document(
        command.user_id,
        command.document_id,
        command.due_date,
        command.notes,
      )
      .await?;
    Ok(document.into())
  }
}
