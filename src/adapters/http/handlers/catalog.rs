use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::require_staff;
use crate::adapters::http::{
  dtos::{CreateCompanyRequest, CreateItemRequest, ItemQuery},
  errors::ApiError,
};
use crate::application::catalog::{
  CreateCompanyCommand, CreateCompanyUseCase, CreateItemCommand, CreateItemUseCase,
  GetCompanyUseCase, GetItemUseCase, ListCompaniesUseCase, ListItemsCommand, ListItemsUseCase,
};

/// GET /api/v1/companies
pub async fn list_companies_handler(
  use_case: web::Data<Arc<ListCompaniesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  Ok(HttpResponse::Ok().json(use_case.execute().await?))
}

/// GET /api/v1/companies/{id}
pub async fn get_company_handler(
  company_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetCompanyUseCase>>,
) -> Result<HttpResponse, ApiError> {
  Ok(HttpResponse::Ok().json(use_case.execute(company_id.into_inner()).await?))
}

/// GET /api/v1/items?company_id=&category=
pub async fn list_items_handler(
  query: web::Query<ItemQuery>,
  use_case: web::Data<Arc<ListItemsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();
  let items = use_case
    .execute(ListItemsCommand {
      company_id: query.company_id,
      category: query.category,
    })
    .await?;
  Ok(HttpResponse::Ok().json(items))
}

/// GET /api/v1/items/{id}
pub async fn get_item_handler(
  item_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  Ok(HttpResponse::Ok().json(use_case.execute(item_id.into_inner()).await?))
}

/// POST /api/v1/admin/companies (staff)
pub async fn create_company_handler(
  request: web::Json<CreateCompanyRequest>,
  use_case: web::Data<Arc<CreateCompanyUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let staff = require_staff(&http_req)?;
  request.validate()?;

  let request = request.into_inner();
  let company = use_case
    .execute(CreateCompanyCommand {
      name: request.name,
      bin_number: request.bin_number.filter(|b| !b.trim().is_empty()),
    })
    .await?;

  tracing::info!(company_id = %company.id, staff_id = %staff.id, "Company created");
  Ok(HttpResponse::Created().json(company))
}

/// POST /api/v1/admin/items (staff)
pub async fn create_item_handler(
  request: web::Json<CreateItemRequest>,
  use_case: web::Data<Arc<CreateItemUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  require_staff(&http_req)?;
  request.validate()?;

  let request = request.into_inner();
  let item = use_case
    .execute(CreateItemCommand {
      company_id: request.company_id,
      title: request.title,
      price: request.price,
      category: request.category,
    })
    .await?;

  Ok(HttpResponse::Created().json(item))
}
