use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Integration, IntegrationSettings};
use super::errors::IntegrationError;
use super::ports::{CredentialCipher, IntegrationRepository};
use super::value_objects::{FileFormat, IntegrationType, ValueObjectError, validate_endpoint};

/// Fallbacks applied to integrations that leave fields empty
#[derive(Debug, Clone)]
pub struct IntegrationDefaults {
  pub export_path: String,
  pub import_path: String,
  pub file_format: FileFormat,
}

impl Default for IntegrationDefaults {
  fn default() -> Self {
    Self {
      export_path: "exports".to_string(),
      import_path: "imports".to_string(),
      file_format: FileFormat::Json,
    }
  }
}

/// Raw integration fields as submitted by staff
#[derive(Debug, Clone)]
pub struct IntegrationInput {
  pub name: String,
  pub integration_type: IntegrationType,
  pub endpoint_url: Option<String>,
  pub username: Option<String>,
  pub password: Option<String>,
  pub export_path: Option<String>,
  pub import_path: Option<String>,
  pub file_format: Option<FileFormat>,
  pub auto_sync: bool,
  pub sync_interval_minutes: Option<i32>,
  pub is_active: bool,
}

pub struct IntegrationService {
  integration_repo: Arc<dyn IntegrationRepository>,
  credentials: Arc<dyn CredentialCipher>,
  defaults: IntegrationDefaults,
}

impl IntegrationService {
  pub const DEFAULT_SYNC_INTERVAL_MINUTES: i32 = 60;

  pub fn new(
    integration_repo: Arc<dyn IntegrationRepository>,
    credentials: Arc<dyn CredentialCipher>,
    defaults: IntegrationDefaults,
  ) -> Self {
    Self {
      integration_repo,
      credentials,
      defaults,
    }
  }

  pub async fn create_integration(
    &self,
    input: IntegrationInput,
  ) -> Result<Integration, IntegrationError> {
    let settings = self.validate(input)?;
    let integration = self
      .integration_repo
      .create(Integration::new(settings))
      .await?;

    tracing::info!(
      integration_id = %integration.id,
      integration_type = %integration.integration_type,
      "Integration created"
    );
    Ok(integration)
  }

  pub async fn update_integration(
    &self,
    integration_id: Uuid,
    input: IntegrationInput,
  ) -> Result<Integration, IntegrationError> {
    let mut integration = self.get_integration(integration_id).await?;
    let settings = self.validate(input)?;

    integration.apply(settings);
    self.integration_repo.update(&integration).await?;
    Ok(integration)
  }

  pub async fn get_integration(&self, integration_id: Uuid) -> Result<Integration, IntegrationError> {
    self
      .integration_repo
      .find_by_id(integration_id)
      .await?
      .ok_or(IntegrationError::IntegrationNotFound(integration_id))
  }

  pub async fn list_integrations(&self) -> Result<Vec<Integration>, IntegrationError> {
    self.integration_repo.list().await
  }

  /// Integrations referenced by sync logs cannot be deleted
  pub async fn delete_integration(&self, integration_id: Uuid) -> Result<(), IntegrationError> {
    self.get_integration(integration_id).await?;
    self.integration_repo.delete(integration_id).await
  }

  fn validate(&self, input: IntegrationInput) -> Result<IntegrationSettings, IntegrationError> {
    let name = input.name.trim();
    if name.is_empty() || name.len() > 100 {
      return Err(ValueObjectError::InvalidName("must be 1-100 characters".to_string()).into());
    }

    let endpoint_url = match input
      .endpoint_url
      .as_deref()
      .map(str::trim)
      .filter(|url| !url.is_empty())
    {
      Some(url) => Some(validate_endpoint(url)?),
      None => None,
    };
    if input.integration_type.requires_endpoint() && endpoint_url.is_none() {
      return Err(
        ValueObjectError::InvalidEndpoint(format!(
          "{} integrations require an endpoint URL",
          input.integration_type
        ))
        .into(),
      );
    }

    let sync_interval_minutes = input
      .sync_interval_minutes
      .unwrap_or(Self::DEFAULT_SYNC_INTERVAL_MINUTES);
    if sync_interval_minutes < 1 {
      return Err(ValueObjectError::InvalidSyncInterval.into());
    }

    let or_default = |value: Option<String>, default: &str| {
      value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
    };

    // An empty password clears the stored one
    let password_encrypted = match input.password {
      Some(password) if password.is_empty() => Some(String::new()),
      Some(password) => Some(self.credentials.encrypt(&password)?),
      None => None,
    };

    Ok(IntegrationSettings {
      name: name.to_string(),
      integration_type: input.integration_type,
      endpoint_url,
      username: input.username.unwrap_or_default().trim().to_string(),
      password_encrypted,
      export_path: or_default(input.export_path, &self.defaults.export_path),
      import_path: or_default(input.import_path, &self.defaults.import_path),
      file_format: input.file_format.unwrap_or(self.defaults.file_format),
      auto_sync: input.auto_sync,
      sync_interval_minutes,
      is_active: input.is_active,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{InMemoryIntegrations, credential_cipher};

  fn input(integration_type: IntegrationType) -> IntegrationInput {
    IntegrationInput {
      name: "Main 1C".into(),
      integration_type,
      endpoint_url: None,
      username: Some("exchange".into()),
      password: Some("s3cret".into()),
      export_path: None,
      import_path: Some("  ".into()),
      file_format: None,
      auto_sync: false,
      sync_interval_minutes: None,
      is_active: true,
    }
  }

  fn service() -> IntegrationService {
    service_over(InMemoryIntegrations::default())
  }

  fn service_over(store: InMemoryIntegrations) -> IntegrationService {
    IntegrationService::new(
      Arc::new(store),
      credential_cipher(),
      IntegrationDefaults::default(),
    )
  }

  #[tokio::test]
  async fn test_file_export_gets_default_paths() {
    let service = service();
    let integration = service
      .create_integration(input(IntegrationType::FileExport))
      .await
      .unwrap();

    assert_eq!(integration.export_path, "exports");
    assert_eq!(integration.import_path, "imports");
    assert_eq!(integration.file_format, FileFormat::Json);
    assert_eq!(integration.sync_interval_minutes, 60);
  }

  #[tokio::test]
  async fn test_webservice_requires_endpoint() {
    let service = service();
    assert!(matches!(
      service
        .create_integration(input(IntegrationType::Webservice))
        .await,
      Err(IntegrationError::Validation(ValueObjectError::InvalidEndpoint(_)))
    ));

    let mut with_url = input(IntegrationType::Hybrid);
    with_url.endpoint_url = Some("https://1c.example.kz/hs/documents".into());
    assert!(service.create_integration(with_url).await.is_ok());
  }

  #[tokio::test]
  async fn test_password_is_stored_encrypted() {
    let store = InMemoryIntegrations::default();
    let service = service_over(store.clone());
    let created = service
      .create_integration(input(IntegrationType::FileExport))
      .await
      .unwrap();

    let stored = store.get(created.id).unwrap();
    assert!(!stored.password_encrypted.is_empty());
    assert!(!stored.password_encrypted.contains("s3cret"));
    assert_eq!(
      credential_cipher().decrypt(&stored.password_encrypted).unwrap(),
      "s3cret"
    );

    let mut change = input(IntegrationType::FileExport);
    change.password = Some("rotated".into());
    service.update_integration(created.id, change).await.unwrap();
    let rotated = store.get(created.id).unwrap();
    assert_ne!(rotated.password_encrypted, stored.password_encrypted);
    assert_eq!(
      credential_cipher().decrypt(&rotated.password_encrypted).unwrap(),
      "rotated"
    );
  }

  #[tokio::test]
  async fn test_update_keeps_password_when_omitted() {
    let service = service();
    let created = service
      .create_integration(input(IntegrationType::FileExport))
      .await
      .unwrap();

    let mut change = input(IntegrationType::FileExport);
    change.password = None;
    change.file_format = Some(FileFormat::Csv);
    let updated = service.update_integration(created.id, change).await.unwrap();

    assert_eq!(updated.password_encrypted, created.password_encrypted);
    assert_eq!(updated.file_format, FileFormat::Csv);

    let mut clear = input(IntegrationType::FileExport);
    clear.password = Some(String::new());
    let cleared = service.update_integration(created.id, clear).await.unwrap();
    assert!(cleared.password_encrypted.is_empty());
  }

  #[tokio::test]
  async fn test_invalid_interval_and_missing_integration() {
    let service = service();

    let mut bad = input(IntegrationType::FileExport);
    bad.sync_interval_minutes = Some(0);
    assert!(service.create_integration(bad).await.is_err());

    assert!(matches!(
      service.delete_integration(Uuid::new_v4()).await,
      Err(IntegrationError::IntegrationNotFound(_))
    ));
  }
}
