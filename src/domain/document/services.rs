use chrono::{Datelike, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{BusinessDocument, DocumentFilter, DocumentItem, NewDocument};
use super::errors::DocumentError;
use super::ports::{DocumentRepository, DocumentSequenceRepository};
use super::value_objects::{DocumentNumber, DocumentStatus, DocumentType, NumberPrefixes, VatRate};
use crate::domain::catalog::CompanyRepository;
use crate::domain::commerce::OrderRepository;

/// Numbering and VAT defaults
#[derive(Debug, Clone)]
pub struct DocumentSettings {
  pub default_vat_rate: VatRate,
  pub prefixes: NumberPrefixes,
}

/// Document creation data
pub struct CreateDocumentData {
  pub order_id: Uuid,
  pub document_type: DocumentType,
  pub buyer_company_id: Uuid,
  pub document_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub vat_rate: Option<VatRate>,
  pub notes: Option<String>,
}

pub struct DocumentService {
  document_repo: Arc<dyn DocumentRepository>,
  sequence_repo: Arc<dyn DocumentSequenceRepository>,
  order_repo: Arc<dyn OrderRepository>,
  company_repo: Arc<dyn CompanyRepository>,
  settings: DocumentSettings,
}

impl DocumentService {
  pub fn new(
    document_repo: Arc<dyn DocumentRepository>,
    sequence_repo: Arc<dyn DocumentSequenceRepository>,
    order_repo: Arc<dyn OrderRepository>,
    company_repo: Arc<dyn CompanyRepository>,
    settings: DocumentSettings,
  ) -> Self {
    Self {
      document_repo,
      sequence_repo,
      order_repo,
      company_repo,
      settings,
    }
  }

  /// Takes the next number of the seller's (type, year, month) sequence
  pub async fn generate_document_number(
    &self,
    document_type: DocumentType,
    seller_company_id: Uuid,
    date: NaiveDate,
  ) -> Result<DocumentNumber, DocumentError> {
    let sequence = self
      .sequence_repo
      .next_value(seller_company_id, document_type, date.year(), date.month())
      .await?;

    Ok(DocumentNumber::format(
      self.settings.prefixes.for_type(document_type),
      date,
      sequence,
    ))
  }

  pub async fn create_document_from_order(
    &self,
    user_id: Uuid,
    data: CreateDocumentData,
  ) -> Result<(BusinessDocument, Vec<DocumentItem>), DocumentError> {
    let order = self
      .order_repo
      .find_by_id(data.order_id)
      .await?
      .filter(|order| order.user_id == user_id)
      .ok_or(DocumentError::OrderNotFound(data.order_id))?;

    let seller_company_id = match order.items.first() {
      Some(first) => first.company_id,
      None => return Err(DocumentError::EmptyOrder(order.id)),
    };
    if order
      .items
      .iter()
      .any(|item| item.company_id != seller_company_id)
    {
      return Err(DocumentError::MixedSellers(order.id));
    }

    for company_id in [seller_company_id, data.buyer_company_id] {
      self
        .company_repo
        .find_by_id(company_id)
        .await?
        .ok_or(DocumentError::CompanyNotFound(company_id))?;
    }

    let document_date = data.document_date.unwrap_or_else(|| Utc::now().date_naive());
    let document_number = self
      .generate_document_number(data.document_type, seller_company_id, document_date)
      .await?;

    let (document, items) = BusinessDocument::draft(
      NewDocument {
        owner_id: user_id,
        document_type: data.document_type,
        order_id: order.id,
        seller_company_id,
        buyer_company_id: data.buyer_company_id,
        document_number,
        document_date,
        due_date: data.due_date,
        vat_rate: data.vat_rate.unwrap_or(self.settings.default_vat_rate),
        notes: data.notes.unwrap_or_default().trim().to_string(),
      },
      &order.items,
    );

    let created = self.document_repo.create(document, items.clone()).await?;

    tracing::info!(
      document_id = %created.id,
      number = %created.document_number,
      total = %created.total_amount,
      "Document created from order"
    );

    Ok((created, items))
  }

  pub async fn get_document(
    &self,
    user_id: Uuid,
    document_id: Uuid,
  ) -> Result<(BusinessDocument, Vec<DocumentItem>), DocumentError> {
    let document = self.owned_document(user_id, document_id).await?;
    let items = self.document_repo.find_items(document.id).await?;
    Ok((document, items))
  }

  pub async fn list_documents(
    &self,
    user_id: Uuid,
    filter: DocumentFilter,
  ) -> Result<Vec<BusinessDocument>, DocumentError> {
    self.document_repo.list_by_owner(user_id, &filter).await
  }

  /// Edits due date and notes of a draft
  pub async fn update_document(
    &self,
    user_id: Uuid,
    document_id: Uuid,
    due_date: Option<NaiveDate>,
    notes: String,
  ) -> Result<BusinessDocument, DocumentError> {
    let mut document = self.owned_document(user_id, document_id).await?;

    if !document.status.is_editable() {
      return Err(DocumentError::NotEditable(document.status));
    }

    document.due_date = due_date;
    document.notes = notes.trim().to_string();
    document.updated_at = Utc::now();

    self.document_repo.update(&document).await?;
    Ok(document)
  }

  pub async fn change_document_status(
    &self,
    user_id: Uuid,
    document_id: Uuid,
    new_status: DocumentStatus,
  ) -> Result<BusinessDocument, DocumentError> {
    let mut document = self.owned_document(user_id, document_id).await?;
    let old_status = document.status;

    if !document.transition_to(new_status) {
      return Err(DocumentError::InvalidStatusTransition {
        from: old_status,
        to: new_status,
      });
    }

    self.document_repo.update(&document).await?;
    tracing::info!(
      document_id = %document.id,
      from = %old_status,
      to = %new_status,
      "Document status changed"
    );
    Ok(document)
  }

  pub async fn delete_document(&self, user_id: Uuid, document_id: Uuid) -> Result<(), DocumentError> {
    let document = self.owned_document(user_id, document_id).await?;

    if document.status != DocumentStatus::Draft {
      return Err(DocumentError::CannotDelete(format!(
        "only draft documents can be deleted, this one is {}",
        document.status
      )));
    }

    self.document_repo.delete(document.id).await
  }

  async fn owned_document(
    &self,
    user_id: Uuid,
    document_id: Uuid,
  ) -> Result<BusinessDocument, DocumentError> {
    self
      .document_repo
      .find_by_id(document_id)
      .await?
      .filter(|document| document.is_owned_by(user_id))
      .ok_or(DocumentError::DocumentNotFound(document_id))
  }
}
