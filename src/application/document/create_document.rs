use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_document::DocumentDetailsResponse;
use crate::domain::document::{
  CreateDocumentData, DocumentError, DocumentService, DocumentType, VatRate,
};

#[derive(Debug, Deserialize)]
pub struct CreateDocumentCommand {
  pub user_id: Uuid,
  pub order_id: Uuid,
  pub document_type: String,
  pub buyer_company_id: Uuid,
  pub document_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub vat_rate: Option<Decimal>,
  pub notes: Option<String>,
}

/// Generates a numbered draft document from one of the user's orders
pub struct CreateDocumentUseCase {
  document_service: Arc<DocumentService>,
}

impl CreateDocumentUseCase {
  pub fn new(document_service: Arc<DocumentService>) -> Self {
    Self { document_service }
  }

  pub async fn execute(
    &self,
    command: CreateDocumentCommand,
  ) -> Result<DocumentDetailsResponse, DocumentError> {
    let document_type = DocumentType::from_str(&command.document_type)?;
    let vat_rate = command.vat_rate.map(VatRate::new).transpose()?;

    let (document, items) = self
      .document_service
      .create_document_from_order(
        command.user_id,
        CreateDocumentData {
          order_id: command.order_id,
          document_type,
          buyer_company_id: command.buyer_company_id,
          document_date: command.document_date,
          due_date: command.due_date,
          vat_rate,
          notes: command.notes,
        },
      )
      .await?;

    Ok(DocumentDetailsResponse::new(document, items))
  }
}
