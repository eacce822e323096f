use std::sync::Arc;
use uuid::Uuid;

use crate::domain::integration::{ImportSummary, IntegrationError, SyncDispatcher};

/// Operator-triggered pickup of 1C confirmation files
pub struct ImportConfirmationsUseCase {
  dispatcher: Arc<SyncDispatcher>,
}

impl ImportConfirmationsUseCase {
  pub fn new(dispatcher: Arc<SyncDispatcher>) -> Self {
    Self { dispatcher }
  }

  pub async fn execute(&self, integration_id: Uuid) -> Result<ImportSummary, IntegrationError> {
    self.dispatcher.import_confirmations(integration_id).await
  }
}
