use thiserror::Error;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, ValueObjectError};

#[derive(Debug, Error)]
pub enum CommerceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error("Item {0} is not in the cart")]
  CartItemNotFound(Uuid),

  #[error("Cart is empty")]
  EmptyCart,

  #[error("Order not found: {0}")]
  OrderNotFound(Uuid),

  #[error("Unknown status: {0}")]
  UnknownStatus(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
