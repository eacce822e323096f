use encoding_rs::Encoding;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::file_export::FileTransport;
use super::hybrid::HybridTransport;
use super::webservice::WebServiceTransport;
use crate::domain::integration::{
  CredentialCipher, DocumentTransport, Integration, IntegrationType, TransportError,
  TransportProvider,
};
use crate::infrastructure::config::OneCConfig;

/// Builds the transport matching an integration's type
pub struct OneCTransportFactory {
  client: Client,
  timeout_secs: u64,
  csv_encoding: &'static Encoding,
  credentials: Arc<dyn CredentialCipher>,
}

impl OneCTransportFactory {
  pub fn new(
    timeout_secs: u64,
    csv_encoding: &'static Encoding,
    credentials: Arc<dyn CredentialCipher>,
  ) -> Result<Self, TransportError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .user_agent(concat!("docsync/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| TransportError::Misconfigured(format!("HTTP client: {}", e)))?;

    Ok(Self {
      client,
      timeout_secs,
      csv_encoding,
      credentials,
    })
  }

  pub fn from_config(
    config: &OneCConfig,
    credentials: Arc<dyn CredentialCipher>,
  ) -> Result<Self, TransportError> {
    let encoding = Encoding::for_label(config.csv_encoding.as_bytes()).ok_or_else(|| {
      TransportError::Misconfigured(format!("unknown CSV encoding {}", config.csv_encoding))
    })?;
    Self::new(config.webservice_timeout_seconds, encoding, credentials)
  }

  fn webservice(&self, integration: &Integration) -> Result<WebServiceTransport, TransportError> {
    let endpoint = integration
      .endpoint_url
      .clone()
      .filter(|url| !url.is_empty())
      .ok_or_else(|| {
        TransportError::Misconfigured(format!(
          "integration {} has no endpoint URL",
          integration.name
        ))
      })?;

    let password = if integration.password_encrypted.is_empty() {
      String::new()
    } else {
      self.credentials.decrypt(&integration.password_encrypted)?
    };

    Ok(WebServiceTransport::new(
      self.client.clone(),
      endpoint,
      integration.username.clone(),
      password,
      self.timeout_secs,
    ))
  }

  fn file(&self, integration: &Integration) -> FileTransport {
    FileTransport::new(
      &integration.export_path,
      integration.file_format,
      self.csv_encoding,
    )
  }
}

impl TransportProvider for OneCTransportFactory {
  fn transport_for(
    &self,
    integration: &Integration,
  ) -> Result<Arc<dyn DocumentTransport>, TransportError> {
    let transport: Arc<dyn DocumentTransport> = match integration.integration_type {
      IntegrationType::Webservice => Arc::new(self.webservice(integration)?),
      IntegrationType::FileExport => Arc::new(self.file(integration)),
      IntegrationType::Hybrid => Arc::new(HybridTransport::new(
        Arc::new(self.webservice(integration)?),
        Arc::new(self.file(integration)),
      )),
    };
    Ok(transport)
  }
}
