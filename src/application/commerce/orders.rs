use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::commerce::{CommerceError, CommerceService, Order};

#[derive(Debug, Serialize)]
pub struct OrderItemDto {
  pub item_id: Uuid,
  pub company_id: Uuid,
  pub title: String,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub line_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OrderDto {
  pub id: Uuid,
  pub status: String,
  pub total_amount: Decimal,
  pub items: Vec<OrderItemDto>,
  pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderDto {
  fn from(order: Order) -> Self {
    Self {
      id: order.id,
      status: order.status.as_str().to_string(),
      total_amount: order.total_amount.amount(),
      items: order
        .items
        .into_iter()
        .map(|item| OrderItemDto {
          item_id: item.item_id,
          company_id: item.company_id,
          line_total: item.line_total().amount(),
          title: item.title,
          quantity: item.quantity.value(),
          unit_price: item.unit_price.amount(),
        })
        .collect(),
      created_at: order.created_at,
    }
  }
}

/// Turns the user's cart into an order
pub struct CreateOrderUseCase {
  commerce_service: Arc<CommerceService>,
}

impl CreateOrderUseCase {
  pub fn new(commerce_service: Arc<CommerceService>) -> Self {
    Self { commerce_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<OrderDto, CommerceError> {
    Ok(self.commerce_service.create_order(user_id).await?.into())
  }
}

pub struct ListOrdersUseCase {
  commerce_service: Arc<CommerceService>,
}

impl ListOrdersUseCase {
  pub fn new(commerce_service: Arc<CommerceService>) -> Self {
    Self { commerce_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<Vec<OrderDto>, CommerceError> {
    let orders = self.commerce_service.list_orders(user_id).await?;
    Ok(orders.into_iter().map(OrderDto::from).collect())
  }
}

pub struct GetOrderUseCase {
  commerce_service: Arc<CommerceService>,
}

impl GetOrderUseCase {
  pub fn new(commerce_service: Arc<CommerceService>) -> Self {
    Self { commerce_service }
  }

  pub async fn execute(&self, user_id: Uuid, order_id: Uuid) -> Result<OrderDto, CommerceError> {
    Ok(
      self
        .commerce_service
        .get_order(user_id, order_id)
        .await?
        .into(),
    )
  }
}
