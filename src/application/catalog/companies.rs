use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogService, Company};

#[derive(Debug, Serialize)]
pub struct CompanyDto {
  pub id: Uuid,
  pub name: String,
  pub bin_number: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl From<Company> for CompanyDto {
  fn from(company: Company) -> Self {
    Self {
      id: company.id,
      name: company.name,
      bin_number: company.bin_number,
      created_at: company.created_at,
    }
  }
}

pub struct ListCompaniesUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListCompaniesUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self) -> Result<Vec<CompanyDto>, CatalogError> {
    let companies = self.catalog_service.list_companies().await?;
    Ok(companies.into_iter().map(CompanyDto::from).collect())
  }
}

pub struct GetCompanyUseCase {
  catalog_service: Arc<CatalogService>,
}

impl GetCompanyUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, company_id: Uuid) -> Result<CompanyDto, CatalogError> {
    Ok(self.catalog_service.get_company(company_id).await?.into())
  }
}

#[derive(Debug, Deserialize)]
pub struct CreateCompanyCommand {
  pub name: String,
  pub bin_number: Option<String>,
}

/// Staff-only company registration
pub struct CreateCompanyUseCase {
  catalog_service: Arc<CatalogService>,
}

impl CreateCompanyUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: CreateCompanyCommand) -> Result<CompanyDto, CatalogError> {
    let company = self
      .catalog_service
      .create_company(&command.name, command.bin_number.as_deref())
      .await?;
    Ok(company.into())
  }
}
