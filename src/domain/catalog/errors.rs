use thiserror::Error;
use uuid::Uuid;

use super::value_objects::ValueObjectError;
use crate::domain::auth::ValueObjectError as IdentityError;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Validation error: {0}")]
  Identity(#[from] IdentityError),

  #[error("Company not found: {0}")]
  CompanyNotFound(Uuid),

  #[error("Item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("A company with BIN {0} already exists")]
  BinAlreadyRegistered(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
