use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{ConfirmationBatch, DeliveryReceipt, ExportPayload, Integration, SyncLog};
use super::errors::{CredentialError, IntegrationError, TransportError};
use super::value_objects::IntegrationType;

#[async_trait]
pub trait IntegrationRepository: Send + Sync {
  async fn create(&self, integration: Integration) -> Result<Integration, IntegrationError>;
  async fn update(&self, integration: &Integration) -> Result<(), IntegrationError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Integration>, IntegrationError>;
  async fn list(&self) -> Result<Vec<Integration>, IntegrationError>;
  /// Oldest active integration
  async fn find_first_active(&self) -> Result<Option<Integration>, IntegrationError>;
  async fn delete(&self, id: Uuid) -> Result<(), IntegrationError>;
  async fn touch_last_sync(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), IntegrationError>;
}

/// Append-only store of sync attempts
#[async_trait]
pub trait SyncLogRepository: Send + Sync {
  async fn append(&self, log: SyncLog) -> Result<SyncLog, IntegrationError>;
  /// Logs of documents owned by `owner_id`, newest first
  async fn list_for_owner(
    &self,
    owner_id: Uuid,
    document_id: Option<Uuid>,
    limit: i64,
  ) -> Result<Vec<SyncLog>, IntegrationError>;
}

/// One way of delivering a document to 1C
#[async_trait]
pub trait DocumentTransport: Send + Sync {
  async fn deliver(&self, payload: &ExportPayload) -> Result<DeliveryReceipt, TransportError>;
  fn kind(&self) -> IntegrationType;
}

/// Builds the transport an integration is configured for
pub trait TransportProvider: Send + Sync {
  fn transport_for(
    &self,
    integration: &Integration,
  ) -> Result<Arc<dyn DocumentTransport>, TransportError>;
}

/// Confirmation files dropped by 1C into the import directory
#[async_trait]
pub trait ConfirmationSource: Send + Sync {
  async fn pending(&self, integration: &Integration) -> Result<ConfirmationBatch, TransportError>;
  async fn mark_processed(
    &self,
    integration: &Integration,
    source: &str,
  ) -> Result<(), TransportError>;
}

/// Encrypts 1C passwords before they reach storage
pub trait CredentialCipher: Send + Sync {
  fn encrypt(&self, plaintext: &str) -> Result<String, CredentialError>;
  fn decrypt(&self, ciphertext: &str) -> Result<String, CredentialError>;
}
