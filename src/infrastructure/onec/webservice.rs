use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::domain::integration::{
  DeliveryReceipt, DocumentTransport, ExportPayload, IntegrationType, SyncStatus, TransportError,
};

const MAX_ERROR_BODY: usize = 500;

/// Posts the JSON payload to a 1C HTTP service
pub struct WebServiceTransport {
  client: Client,
  endpoint_url: String,
  username: String,
  password: String,
  timeout_secs: u64,
}

impl WebServiceTransport {
  pub fn new(
    client: Client,
    endpoint_url: String,
    username: String,
    password: String,
    timeout_secs: u64,
  ) -> Self {
    Self {
      client,
      endpoint_url,
      username,
      password,
      timeout_secs,
    }
  }

  fn map_send_error(&self, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
      TransportError::Timeout(self.timeout_secs)
    } else {
      TransportError::Connection(error.to_string())
    }
  }
}

/// External id reported by 1C, accepting string or numeric `external_id`/`id`
fn external_id_from(body: &Value) -> Option<String> {
  ["external_id", "id"]
    .iter()
    .filter_map(|key| body.get(*key))
    .find_map(|value| match value {
      Value::String(s) if !s.is_empty() => Some(s.clone()),
      Value::Number(n) => Some(n.to_string()),
      _ => None,
    })
}

#[async_trait]
impl DocumentTransport for WebServiceTransport {
  async fn deliver(&self, payload: &ExportPayload) -> Result<DeliveryReceipt, TransportError> {
    let mut request = self
      .client
      .post(&self.endpoint_url)
      .header(reqwest::header::ACCEPT, "application/json")
      .json(payload);
    if !self.username.is_empty() {
      request = request.basic_auth(&self.username, Some(&self.password));
    }

    let response = request
      .send()
      .await
      .map_err(|e| self.map_send_error(e))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| self.map_send_error(e))?;

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
      return Err(TransportError::AuthenticationFailed(status.as_u16()));
    }
    if !status.is_success() {
      let mut body = body;
      if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
          .rev()
          .find(|i| body.is_char_boundary(*i))
          .unwrap_or(0);
        body.truncate(cut);
      }
      return Err(TransportError::Rejected {
        status: status.as_u16(),
        body,
      });
    }

    let response_data = serde_json::from_str::<Value>(&body).ok();
    let external_id = response_data
      .as_ref()
      .and_then(external_id_from)
      .unwrap_or_else(|| format!("1C_{}", payload.document_number));

    tracing::debug!(
      document_number = %payload.document_number,
      external_id = %external_id,
      "Delivered to 1C web service"
    );

    Ok(DeliveryReceipt {
      status: SyncStatus::Success,
      message: "Document exported via 1C web service".to_string(),
      external_id: Some(external_id),
      file_path: None,
      response_data,
    })
  }

  fn kind(&self) -> IntegrationType {
    IntegrationType::Webservice
  }
}
