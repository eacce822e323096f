use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::integration::{
  DeliveryReceipt, DocumentTransport, ExportPayload, IntegrationType, TransportError,
};

/// Web service first, file drop when the service fails
pub struct HybridTransport {
  webservice: Arc<dyn DocumentTransport>,
  file: Arc<dyn DocumentTransport>,
}

impl HybridTransport {
  pub fn new(webservice: Arc<dyn DocumentTransport>, file: Arc<dyn DocumentTransport>) -> Self {
    Self { webservice, file }
  }
}

#[async_trait]
impl DocumentTransport for HybridTransport {
  async fn deliver(&self, payload: &ExportPayload) -> Result<DeliveryReceipt, TransportError> {
    let ws_error = match self.webservice.deliver(payload).await {
      Ok(receipt) => return Ok(receipt),
      Err(e) => e,
    };

    tracing::warn!(
      document_number = %payload.document_number,
      error = %ws_error,
      "Web service export failed, falling back to file export"
    );

    match self.file.deliver(payload).await {
      Ok(mut receipt) => {
        receipt.message = format!(
          "Web service failed ({}); {}",
          ws_error, receipt.message
        );
        let mut data = receipt
          .response_data
          .take()
          .unwrap_or_else(|| serde_json::json!({}));
        if let Some(object) = data.as_object_mut() {
          object.insert(
            "webservice_error".to_string(),
            serde_json::Value::String(ws_error.to_string()),
          );
        }
        receipt.response_data = Some(data);
        Ok(receipt)
      }
      Err(file_error) => Err(TransportError::HybridFailed {
        webservice: ws_error.to_string(),
        file: file_error.to_string(),
      }),
    }
  }

  fn kind(&self) -> IntegrationType {
    IntegrationType::Hybrid
  }
}
