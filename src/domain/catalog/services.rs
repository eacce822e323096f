use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Company, Item, ItemFilter};
use super::errors::CatalogError;
use super::ports::{CompanyRepository, ItemRepository};
use super::value_objects::{Money, display_name};
use crate::domain::auth::Bin;

/// Companies and items that orders are built from
pub struct CatalogService {
  company_repo: Arc<dyn CompanyRepository>,
  item_repo: Arc<dyn ItemRepository>,
}

impl CatalogService {
  pub fn new(company_repo: Arc<dyn CompanyRepository>, item_repo: Arc<dyn ItemRepository>) -> Self {
    Self {
      company_repo,
      item_repo,
    }
  }

  pub async fn list_companies(&self) -> Result<Vec<Company>, CatalogError> {
    self.company_repo.list().await
  }

  pub async fn get_company(&self, company_id: Uuid) -> Result<Company, CatalogError> {
    self
      .company_repo
      .find_by_id(company_id)
      .await?
      .ok_or(CatalogError::CompanyNotFound(company_id))
  }

  pub async fn create_company(
    &self,
    name: &str,
    bin_number: Option<&str>,
  ) -> Result<Company, CatalogError> {
    let name = display_name(name, "Company name", 255)?;

    let bin = match bin_number.map(str::trim).filter(|b| !b.is_empty()) {
      Some(raw) => {
        let bin = Bin::new(raw)?;
        if self.company_repo.find_by_bin(&bin).await?.is_some() {
          return Err(CatalogError::BinAlreadyRegistered(bin.into_inner()));
        }
        Some(bin.into_inner())
      }
      None => None,
    };

    let company = self.company_repo.create(Company::new(name, bin)).await?;
    tracing::info!(company_id = %company.id, "Company created");
    Ok(company)
  }

  pub async fn list_items(&self, filter: ItemFilter) -> Result<Vec<Item>, CatalogError> {
    self.item_repo.list(&filter).await
  }

  pub async fn get_item(&self, item_id: Uuid) -> Result<Item, CatalogError> {
    self
      .item_repo
      .find_by_id(item_id)
      .await?
      .ok_or(CatalogError::ItemNotFound(item_id))
  }

  pub async fn create_item(
    &self,
    company_id: Uuid,
    title: &str,
    price: Decimal,
    category: &str,
  ) -> Result<Item, CatalogError> {
    let title = display_name(title, "Item title", 255)?;
    let price = Money::new(price)?;

    // Verify company exists
    self.get_company(company_id).await?;

    let item = Item::new(company_id, title, price, category.trim().to_string());
    self.item_repo.create(item).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::InMemoryCatalog;
  use rust_decimal_macros::dec;

  fn service(catalog: &InMemoryCatalog) -> CatalogService {
    CatalogService::new(Arc::new(catalog.clone()), Arc::new(catalog.clone()))
  }

  #[tokio::test]
  async fn test_create_company_validates_bin() {
    let catalog = InMemoryCatalog::default();
    let service = service(&catalog);

    let company = service
      .create_company("Halyk Trade", Some("940140000385"))
      .await
      .unwrap();
    assert_eq!(company.bin_number.as_deref(), Some("940140000385"));

    assert!(matches!(
      service.create_company("Other", Some("940140000386")).await,
      Err(CatalogError::Identity(_))
    ));
    assert!(matches!(
      service.create_company("Clone", Some("940140000385")).await,
      Err(CatalogError::BinAlreadyRegistered(_))
    ));
  }

  #[tokio::test]
  async fn test_create_company_without_bin() {
    let catalog = InMemoryCatalog::default();
    let company = service(&catalog)
      .create_company("  Market  ", Some("  "))
      .await
      .unwrap();
    assert_eq!(company.name, "Market");
    assert!(company.bin_number.is_none());
  }

  #[tokio::test]
  async fn test_create_item_requires_company() {
    let catalog = InMemoryCatalog::default();
    let service = service(&catalog);

    let missing = Uuid::new_v4();
    assert!(matches!(
      service.create_item(missing, "Laptop", dec!(100), "tech").await,
      Err(CatalogError::CompanyNotFound(id)) if id == missing
    ));
  }

  #[tokio::test]
  async fn test_list_items_filters_by_category() {
    let catalog = InMemoryCatalog::default();
    let service = service(&catalog);

    let company = service.create_company("Shop", None).await.unwrap();
    service
      .create_item(company.id, "Laptop", dec!(350000), "tech")
      .await
      .unwrap();
    service
      .create_item(company.id, "Desk", dec!(45000), "furniture")
      .await
      .unwrap();

    let tech = service
      .list_items(ItemFilter {
        category: Some("tech".into()),
        ..ItemFilter::default()
      })
      .await
      .unwrap();
    assert_eq!(tech.len(), 1);
    assert_eq!(tech[0].title, "Laptop");

    assert!(service.create_item(company.id, "Bad", dec!(-1), "").await.is_err());
  }
}
