use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::document::{BusinessDocument, DocumentError, DocumentItem, DocumentService};

#[derive(Debug, Deserialize)]
pub struct GetDocumentCommand {
  pub user_id: Uuid,
  pub document_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DocumentItemDto {
  pub id: Uuid,
  pub item_id: Option<Uuid>,
  pub title: String,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub total_price: Decimal,
  pub line_order: i32,
}

impl From<DocumentItem> for DocumentItemDto {
  fn from(item: DocumentItem) -> Self {
    Self {
      id: item.id,
      item_id: item.item_id,
      title: item.title,
      quantity: item.quantity.value(),
      unit_price: item.unit_price.amount(),
      total_price: item.total_price.amount(),
      line_order: item.line_order,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct DocumentDto {
  pub id: Uuid,
  pub document_type: String,
  pub document_type_label: String,
  pub order_id: Uuid,
  pub seller_company_id: Uuid,
  pub buyer_company_id: Uuid,
  pub document_number: String,
  pub document_date: NaiveDate,
  pub due_date: Option<NaiveDate>,
  pub subtotal: Decimal,
  pub vat_rate: Decimal,
  pub vat_amount: Decimal,
  pub total_amount: Decimal,
  pub status: String,
  pub notes: String,
  pub external_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<BusinessDocument> for DocumentDto {
  fn from(document: BusinessDocument) -> Self {
    Self {
      id: document.id,
      document_type: document.document_type.as_str().to_string(),
      document_type_label: document.document_type.label().to_string(),
      order_id: document.order_id,
      seller_company_id: document.seller_company_id,
      buyer_company_id: document.buyer_company_id,
      document_number: document.document_number.into_inner(),
      document_date: document.document_date,
      due_date: document.due_date,
      subtotal: document.subtotal.amount(),
      vat_rate: document.vat_rate.value(),
      vat_amount: document.vat_amount.amount(),
      total_amount: document.total_amount.amount(),
      status: document.status.as_str().to_string(),
      notes: document.notes,
      external_id: document.external_id,
      created_at: document.created_at,
      updated_at: document.updated_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct DocumentDetailsResponse {
  #[serde(flatten)]
  pub document: DocumentDto,
  pub items: Vec<DocumentItemDto>,
}

impl DocumentDetailsResponse {
  pub fn new(document: BusinessDocument, items: Vec<DocumentItem>) -> Self {
    Self {
      document: document.into(),
      items: items.into_iter().map(DocumentItemDto::from).collect(),
    }
  }
}

pub struct GetDocumentUseCase {
  document_service: Arc<DocumentService>,
}

impl GetDocumentUseCase {
  pub fn new(document_service: Arc<DocumentService>) -> Self {
    Self { document_service }
  }

  pub async fn execute(
    &self,
    command: GetDocumentCommand,
  ) -> Result<DocumentDetailsResponse, DocumentError> {
    let (document, items) = self
      .document_service
      .get_document(command.user_id, command.document_id)
      .await?;
    Ok(DocumentDetailsResponse::new(document, items))
  }
}
