use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_document::DocumentDto;
use crate::domain::document::{
  DocumentError, DocumentFilter, DocumentService, DocumentStatus, DocumentType,
};

#[derive(Debug, Deserialize)]
pub struct ListDocumentsCommand {
  pub user_id: Uuid,
  pub document_type: Option<String>,
  pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListDocumentsResponse {
  pub documents: Vec<DocumentDto>,
  pub total: usize,
}

pub struct ListDocumentsUseCase {
  document_service: Arc<DocumentService>,
}

impl ListDocumentsUseCase {
  pub fn new(document_service: Arc<DocumentService>) -> Self {
    Self { document_service }
  }

  pub async fn execute(
    &self,
    command: ListDocumentsCommand,
  ) -> Result<ListDocumentsResponse, DocumentError> {
    let filter = DocumentFilter {
      document_type: command
        .document_type
        .as_deref()
        .map(DocumentType::from_str)
        .transpose()?,
      status: command
        .status
        .as_deref()
        .map(DocumentStatus::from_str)
        .transpose()?,
    };

    let documents: Vec<DocumentDto> = self
      .document_service
      .list_documents(command.user_id, filter)
      .await?
      .into_iter()
      .map(DocumentDto::from)
      .collect();

    Ok(ListDocumentsResponse {
      total: documents.len(),
      documents,
    })
  }
}
