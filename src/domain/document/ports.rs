use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{BusinessDocument, DocumentFilter, DocumentItem};
use super::errors::DocumentError;
use super::value_objects::DocumentType;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
  /// Inserts the document and its lines in one transaction
  async fn create(
    &self,
    document: BusinessDocument,
    items: Vec<DocumentItem>,
  ) -> Result<BusinessDocument, DocumentError>;
  async fn update(&self, document: &BusinessDocument) -> Result<(), DocumentError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<BusinessDocument>, DocumentError>;
  async fn find_items(&self, document_id: Uuid) -> Result<Vec<DocumentItem>, DocumentError>;
  /// Newest document date first, then newest creation
  async fn list_by_owner(
    &self,
    owner_id: Uuid,
    filter: &DocumentFilter,
  ) -> Result<Vec<BusinessDocument>, DocumentError>;
  /// Looks a document up by number, optionally scoped to one seller
  async fn find_by_number(
    &self,
    seller_company_id: Option<Uuid>,
    document_number: &str,
  ) -> Result<Vec<BusinessDocument>, DocumentError>;
  async fn delete(&self, id: Uuid) -> Result<(), DocumentError>;
}

#[async_trait]
pub trait DocumentSequenceRepository: Send + Sync {
  /// Atomically increments and returns the sequence for one numbering period
  async fn next_value(
    &self,
    seller_company_id: Uuid,
    document_type: DocumentType,
    year: i32,
    month: u32,
  ) -> Result<i64, DocumentError>;
}
