use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::integration::{
  FileFormat, Integration, IntegrationError, IntegrationInput, IntegrationService, IntegrationType,
};

/// Integration as shown to staff; the password is reported only as set or not
#[derive(Debug, Serialize)]
pub struct IntegrationDto {
  pub id: Uuid,
  pub name: String,
  pub integration_type: String,
  pub endpoint_url: Option<String>,
  pub username: String,
  pub has_password: bool,
  pub export_path: String,
  pub import_path: String,
  pub file_format: String,
  pub auto_sync: bool,
  pub sync_interval_minutes: i32,
  pub last_sync: Option<DateTime<Utc>>,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}

impl From<Integration> for IntegrationDto {
  fn from(integration: Integration) -> Self {
    Self {
      id: integration.id,
      name: integration.name,
      integration_type: integration.integration_type.as_str().to_string(),
      endpoint_url: integration.endpoint_url,
      username: integration.username,
      has_password: !integration.password_encrypted.is_empty(),
      export_path: integration.export_path,
      import_path: integration.import_path,
      file_format: integration.file_format.as_str().to_string(),
      auto_sync: integration.auto_sync,
      sync_interval_minutes: integration.sync_interval_minutes,
      last_sync: integration.last_sync,
      is_active: integration.is_active,
      created_at: integration.created_at,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationCommand {
  pub name: String,
  pub integration_type: String,
  pub endpoint_url: Option<String>,
  pub username: Option<String>,
  pub password: Option<String>,
  pub export_path: Option<String>,
  pub import_path: Option<String>,
  pub file_format: Option<String>,
  pub auto_sync: bool,
  pub sync_interval_minutes: Option<i32>,
  pub is_active: bool,
}

impl IntegrationCommand {
  fn into_input(self) -> Result<IntegrationInput, IntegrationError> {
    Ok(IntegrationInput {
      integration_type: IntegrationType::from_str(&self.integration_type)?,
      file_format: self
        .file_format
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .map(FileFormat::from_str)
        .transpose()?,
      name: self.name,
      endpoint_url: self.endpoint_url,
      username: self.username,
      password: self.password,
      export_path: self.export_path,
      import_path: self.import_path,
      auto_sync: self.auto_sync,
      sync_interval_minutes: self.sync_interval_minutes,
      is_active: self.is_active,
    })
  }
}

pub struct CreateIntegrationUseCase {
  integration_service: Arc<IntegrationService>,
}

impl CreateIntegrationUseCase {
  pub fn new(integration_service: Arc<IntegrationService>) -> Self {
    Self {
      integration_service,
    }
  }

  pub async fn execute(&self, command: IntegrationCommand) -> Result<IntegrationDto, IntegrationError> {
    let integration = self
      .integration_service
      .create_integration(command.into_input()?)
      .await?;
    Ok(integration.into())
  }
}

/// Replaces integration settings; an omitted password keeps the stored one
pub struct UpdateIntegrationUseCase {
  integration_service: Arc<IntegrationService>,
}

impl UpdateIntegrationUseCase {
  pub fn new(integration_service: Arc<IntegrationService>) -> Self {
    Self {
      integration_service,
    }
  }

  pub async fn execute(
    &self,
    integration_id: Uuid,
    command: IntegrationCommand,
  ) -> Result<IntegrationDto, IntegrationError> {
    let integration = self
      .integration_service
      .update_integration(integration_id, command.into_input()?)
      .await?;
    Ok(integration.into())
  }
}

pub struct GetIntegrationUseCase {
  integration_service: Arc<IntegrationService>,
}

impl GetIntegrationUseCase {
  pub fn new(integration_service: Arc<IntegrationService>) -> Self {
    Self {
      integration_service,
    }
  }

  pub async fn execute(&self, integration_id: Uuid) -> Result<IntegrationDto, IntegrationError> {
    Ok(
      self
        .integration_service
        .get_integration(integration_id)
        .await?
        .into(),
    )
  }
}

pub struct ListIntegrationsUseCase {
  integration_service: Arc<IntegrationService>,
}

impl ListIntegrationsUseCase {
  pub fn new(integration_service: Arc<IntegrationService>) -> Self {
    Self {
      integration_service,
    }
  }

  pub async fn execute(&self) -> Result<Vec<IntegrationDto>, IntegrationError> {
    let integrations = self.integration_service.list_integrations().await?;
    Ok(integrations.into_iter().map(IntegrationDto::from).collect())
  }
}

pub struct DeleteIntegrationUseCase {
  integration_service: Arc<IntegrationService>,
}

impl DeleteIntegrationUseCase {
  pub fn new(integration_service: Arc<IntegrationService>) -> Self {
    Self {
      integration_service,
    }
  }

  pub async fn execute(&self, integration_id: Uuid) -> Result<(), IntegrationError> {
    self
      .integration_service
      .delete_integration(integration_id)
      .await
  }
}
