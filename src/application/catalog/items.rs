use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogService, Item, ItemFilter};

#[derive(Debug, Serialize)]
pub struct ItemDto {
  pub id: Uuid,
  pub company_id: Uuid,
  pub title: String,
  pub price: Decimal,
  pub category: String,
}

impl From<Item> for ItemDto {
  fn from(item: Item) -> Self {
    Self {
      id: item.id,
      company_id: item.company_id,
      title: item.title,
      price: item.price.amount(),
      category: item.category,
    }
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListItemsCommand {
  pub company_id: Option<Uuid>,
  pub category: Option<String>,
}

pub struct ListItemsUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListItemsUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: ListItemsCommand) -> Result<Vec<ItemDto>, CatalogError> {
    let filter = ItemFilter {
      company_id: command.company_id,
      category: command
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty()),
    };

    let items = self.catalog_service.list_items(filter).await?;
    Ok(items.into_iter().map(ItemDto::from).collect())
  }
}

pub struct GetItemUseCase {
  catalog_service: Arc<CatalogService>,
}

impl GetItemUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, item_id: Uuid) -> Result<ItemDto, CatalogError> {
    Ok(self.catalog_service.get_item(item_id).await?.into())
  }
}

#[derive(Debug, Deserialize)]
pub struct CreateItemCommand {
  pub company_id: Uuid,
  pub title: String,
  pub price: Decimal,
  #[serde(default)]
  pub category: String,
}

/// Staff-only catalog item creation
pub struct CreateItemUseCase {
  catalog_service: Arc<CatalogService>,
}

impl CreateItemUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: CreateItemCommand) -> Result<ItemDto, CatalogError> {
    let item = self
      .catalog_service
      .create_item(
        command.company_id,
        &command.title,
        command.price,
        &command.category,
      )
      .await?;
    Ok(item.into())
  }
}
