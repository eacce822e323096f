use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{ChangeStatusRequest, CreateDocumentRequest, DocumentQuery, UpdateDocumentRequest},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::document::{
  ChangeDocumentStatusCommand, ChangeDocumentStatusUseCase, CreateDocumentCommand,
  CreateDocumentUseCase, DeleteDocumentCommand, DeleteDocumentUseCase, GetDocumentCommand,
  GetDocumentUseCase, ListDocumentsCommand, ListDocumentsUseCase, UpdateDocumentCommand,
  UpdateDocumentUseCase,
};

/// GET /api/v1/documents?document_type=&status=
pub async fn list_documents_handler(
  query: web::Query<DocumentQuery>,
  use_case: web::Data<Arc<ListDocumentsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let query = query.into_inner();

  let response = use_case
    .execute(ListDocumentsCommand {
      user_id: user.id,
      document_type: query.document_type.filter(|t| !t.is_empty()),
      status: query.status.filter(|s| !s.is_empty()),
    })
    .await?;

  Ok(HttpResponse::Ok().json(response))
}

/// POST /api/v1/documents
///
/// Generates a numbered document from one of the user's orders.
pub async fn create_document_handler(
  request: web::Json<CreateDocumentRequest>,
  use_case: web::Data<Arc<CreateDocumentUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  request.validate()?;

  let request = request.into_inner();
  let document = use_case
    .execute(CreateDocumentCommand {
      user_id: user.id,
      order_id: request.order_id,
      document_type: request.document_type,
      buyer_company_id: request.buyer_company_id,
      document_date: request.document_date,
      due_date: request.due_date,
      vat_rate: request.vat_rate,
      notes: request.notes,
    })
    .await?;

  Ok(HttpResponse::Created().json(document))
}

/// GET /api/v1/documents/{id}
pub async fn get_document_handler(
  document_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetDocumentUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let document = use_case
    .execute(GetDocumentCommand {
      user_id: user.id,
      document_id: document_id.into_inner(),
    })
    .await?;
  Ok(HttpResponse::Ok().json(document))
}

/// PATCH /api/v1/documents/{id}
pub async fn update_document_handler(
  document_id: web::Path<Uuid>,
  request: web::Json<UpdateDocumentRequest>,
  use_case: web::Data<Arc<UpdateDocumentUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  request.validate()?;

  let request = request.into_inner();
  let document = use_case
    .execute(UpdateDocumentCommand {
      user_id: user.id,
      document_id: document_id.into_inner(),
      due_date: request.due_date,
      notes: request.notes,
    })
    .await?;
  Ok(HttpResponse::Ok().json(document))
}

/// DELETE /api/v1/documents/{id}
pub async fn delete_document_handler(
  document_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteDocumentUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  use_case
    .execute(DeleteDocumentCommand {
      user_id: user.id,
      document_id: document_id.into_inner(),
    })
    .await?;
  Ok(HttpResponse::NoContent().finish())
}

/// POST /api/v1/documents/{id}/status
pub async fn change_status_handler(
  document_id: web::Path<Uuid>,
  request: web::Json<ChangeStatusRequest>,
  use_case: web::Data<Arc<ChangeDocumentStatusUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let response = use_case
    .execute(ChangeDocumentStatusCommand {
      user_id: user.id,
      document_id: document_id.into_inner(),
      new_status: request.into_inner().status,
    })
    .await?;
  Ok(HttpResponse::Ok().json(response))
}
