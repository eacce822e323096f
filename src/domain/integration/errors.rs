use thiserror::Error;
use uuid::Uuid;

use super::value_objects::{IntegrationType, ValueObjectError};
use crate::domain::catalog::CatalogError;
use crate::domain::document::DocumentError;

/// Failures protecting stored 1C credentials
#[derive(Debug, Error)]
pub enum CredentialError {
  #[error("Encryption failed: {0}")]
  EncryptionFailed(String),

  #[error("Decryption failed: {0}")]
  DecryptionFailed(String),
}

/// Failures of a single delivery attempt
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("1C rejected the credentials (HTTP {0})")]
  AuthenticationFailed(u16),

  #[error("1C responded with HTTP {status}: {body}")]
  Rejected { status: u16, body: String },

  #[error("1C did not respond within {0} seconds")]
  Timeout(u64),

  #[error("Cannot reach 1C: {0}")]
  Connection(String),

  #[error("File I/O failed: {0}")]
  Io(#[from] std::io::Error),

  #[error("Encoding failed: {0}")]
  Encoding(String),

  #[error("Web service failed ({webservice}) and file fallback failed ({file})")]
  HybridFailed { webservice: String, file: String },

  #[error("Integration is misconfigured: {0}")]
  Misconfigured(String),

  #[error("Stored credentials are unusable: {0}")]
  Credentials(#[from] CredentialError),
}

#[derive(Debug, Error)]
pub enum IntegrationError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Integration not found: {0}")]
  IntegrationNotFound(Uuid),

  #[error("No active integration is configured")]
  NoActiveIntegration,

  #[error("Integration {0} is not active")]
  IntegrationInactive(Uuid),

  #[error("Integration type {0} does not read confirmation files")]
  ImportNotSupported(IntegrationType),

  #[error("Cannot delete integration: {0}")]
  CannotDelete(String),

  #[error("No documents selected")]
  EmptyBatch,

  #[error("Too many documents: {actual} selected, at most {max} allowed")]
  BatchTooLarge { max: usize, actual: usize },

  #[error("Document cannot be exported: {0}")]
  NotExportable(String),

  #[error("Sync failed: {0}")]
  Transport(#[from] TransportError),

  #[error(transparent)]
  Credentials(#[from] CredentialError),

  #[error(transparent)]
  Document(#[from] DocumentError),

  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
