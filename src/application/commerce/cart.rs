use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::commerce::{Cart, CommerceError, CommerceService};

#[derive(Debug, Serialize)]
pub struct CartLineDto {
  pub item_id: Uuid,
  pub company_id: Uuid,
  pub title: String,
  pub unit_price: Decimal,
  pub quantity: i32,
  pub line_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
  pub items: Vec<CartLineDto>,
  pub total: Decimal,
}

impl From<Cart> for CartResponse {
  fn from(cart: Cart) -> Self {
    Self {
      total: cart.total.amount(),
      items: cart
        .lines
        .into_iter()
        .map(|line| CartLineDto {
          item_id: line.item.id,
          company_id: line.item.company_id,
          title: line.item.title,
          unit_price: line.item.price.amount(),
          quantity: line.quantity.value(),
          line_total: line.line_total.amount(),
        })
        .collect(),
    }
  }
}

pub struct GetCartUseCase {
  commerce_service: Arc<CommerceService>,
}

impl GetCartUseCase {
  pub fn new(commerce_service: Arc<CommerceService>) -> Self {
    Self { commerce_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<CartResponse, CommerceError> {
    Ok(self.commerce_service.get_cart(user_id).await?.into())
  }
}

#[derive(Debug, Deserialize)]
pub struct AddToCartCommand {
  pub user_id: Uuid,
  pub item_id: Uuid,
  pub quantity: i32,
}

pub struct AddToCartUseCase {
  commerce_service: Arc<CommerceService>,
}

impl AddToCartUseCase {
  pub fn new(commerce_service: Arc<CommerceService>) -> Self {
    Self { commerce_service }
  }

  pub async fn execute(&self, command: AddToCartCommand) -> Result<CartResponse, CommerceError> {
    let cart = self
      .commerce_service
      .add_to_cart(command.user_id, command.item_id, command.quantity)
      .await?;
    Ok(cart.into())
  }
}

pub struct RemoveFromCartUseCase {
  commerce_service: Arc<CommerceService>,
}

impl RemoveFromCartUseCase {
  pub fn new(commerce_service: Arc<CommerceService>) -> Self {
    Self { commerce_service }
  }

  pub async fn execute(&self, user_id: Uuid, item_id: Uuid) -> Result<CartResponse, CommerceError> {
    Ok(
      self
        .commerce_service
        .remove_from_cart(user_id, item_id)
        .await?
        .into(),
    )
  }
}
