use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Company, Item, ItemFilter};
use super::errors::CatalogError;
use crate::domain::auth::Bin;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
  async fn create(&self, company: Company) -> Result<Company, CatalogError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CatalogError>;
  async fn find_by_bin(&self, bin: &Bin) -> Result<Option<Company>, CatalogError>;
  async fn list(&self) -> Result<Vec<Company>, CatalogError>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
  async fn create(&self, item: Item) -> Result<Item, CatalogError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, CatalogError>;
  async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, CatalogError>;
}
