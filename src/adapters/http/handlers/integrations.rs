use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::require_staff;
use crate::adapters::http::{dtos::IntegrationRequest, errors::ApiError};
use crate::application::integration::{
  CreateIntegrationUseCase, DeleteIntegrationUseCase, GetIntegrationUseCase,
  ImportConfirmationsUseCase, IntegrationCommand, ListIntegrationsUseCase,
  UpdateIntegrationUseCase,
};

impl From<IntegrationRequest> for IntegrationCommand {
  fn from(request: IntegrationRequest) -> Self {
    Self {
      name: request.name,
      integration_type: request.integration_type,
      endpoint_url: request.endpoint_url,
      username: request.username,
      password: request.password,
      export_path: request.export_path,
      import_path: request.import_path,
      file_format: request.file_format,
      auto_sync: request.auto_sync,
      sync_interval_minutes: request.sync_interval_minutes,
      is_active: request.is_active,
    }
  }
}

/// GET /api/v1/integrations
pub async fn list_integrations_handler(
  use_case: web::Data<Arc<ListIntegrationsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  require_staff(&http_req)?;
  Ok(HttpResponse::Ok().json(use_case.execute().await?))
}

/// POST /api/v1/integrations
pub async fn create_integration_handler(
  request: web::Json<IntegrationRequest>,
  use_case: web::Data<Arc<CreateIntegrationUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let staff = require_staff(&http_req)?;
  request.validate()?;

  let integration = use_case.execute(request.into_inner().into()).await?;
  tracing::info!(
    integration_id = %integration.id,
    staff_id = %staff.id,
    "Integration configured"
  );
  Ok(HttpResponse::Created().json(integration))
}

/// GET /api/v1/integrations/{id}
pub async fn get_integration_handler(
  integration_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetIntegrationUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  require_staff(&http_req)?;
  Ok(HttpResponse::Ok().json(use_case.execute(integration_id.into_inner()).await?))
}

/// PUT /api/v1/integrations/{id}
pub async fn update_integration_handler(
  integration_id: web::Path<Uuid>,
  request: web::Json<IntegrationRequest>,
  use_case: web::Data<Arc<UpdateIntegrationUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  require_staff(&http_req)?;
  request.validate()?;

  let integration = use_case
    .execute(integration_id.into_inner(), request.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(integration))
}

/// DELETE /api/v1/integrations/{id}
pub async fn delete_integration_handler(
  integration_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteIntegrationUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  require_staff(&http_req)?;
  use_case.execute(integration_id.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}

/// POST /api/v1/integrations/{id}/import
///
/// Reads confirmation files 1C left in the import directory.
pub async fn import_confirmations_handler(
  integration_id: web::Path<Uuid>,
  use_case: web::Data<Arc<ImportConfirmationsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  require_staff(&http_req)?;
  let summary = use_case.execute(integration_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(summary))
}
