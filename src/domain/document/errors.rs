use thiserror::Error;
use uuid::Uuid;

use super::value_objects::{DocumentStatus, ValueObjectError};
use crate::domain::catalog::{CatalogError, ValueObjectError as AmountError};
use crate::domain::commerce::CommerceError;

#[derive(Debug, Error)]
pub enum DocumentError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Validation error: {0}")]
  Amount(#[from] AmountError),

  #[error("Document not found: {0}")]
  DocumentNotFound(Uuid),

  #[error("Order not found: {0}")]
  OrderNotFound(Uuid),

  #[error("Company not found: {0}")]
  CompanyNotFound(Uuid),

  #[error("Order {0} has no items")]
  EmptyOrder(Uuid),

  #[error("Order {0} contains items from more than one seller")]
  MixedSellers(Uuid),

  #[error("Document number {0} already exists")]
  DuplicateNumber(String),

  #[error("Cannot edit a document in status {0}")]
  NotEditable(DocumentStatus),

  #[error("Cannot change status from {from} to {to}")]
  InvalidStatusTransition {
    from: DocumentStatus,
    to: DocumentStatus,
  },

  #[error("Cannot delete document: {0}")]
  CannotDelete(String),

  #[error(transparent)]
  Commerce(#[from] CommerceError),

  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
