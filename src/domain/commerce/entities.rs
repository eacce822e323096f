use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{OrderStatus, PaymentStatus};
use crate::domain::catalog::{Item, Money, Quantity};

// Cart Item - persisted cart row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
  pub user_id: Uuid,
  pub item_id: Uuid,
  pub quantity: Quantity,
  pub added_at: DateTime<Utc>,
}

// Cart Line - cart row joined with the current catalog item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
  pub item: Item,
  pub quantity: Quantity,
  pub line_total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cart {
  pub user_id: Uuid,
  pub lines: Vec<CartLine>,
  pub total: Money,
}

impl Cart {
  pub fn new(user_id: Uuid, lines: Vec<CartLine>) -> Self {
    let total = lines
      .iter()
      .fold(Money::zero(), |acc, line| acc.add(&line.line_total));
    Self {
      user_id,
      lines,
      total,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }
}

// Order Item - price snapshot taken when the order is placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub item_id: Uuid,
  pub company_id: Uuid,
  pub title: String,
  pub quantity: Quantity,
  pub unit_price: Money,
  pub line_order: i32,
}

impl OrderItem {
  pub fn line_total(&self) -> Money {
    self.unit_price.times(self.quantity)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub status: OrderStatus,
  pub total_amount: Money,
  pub items: Vec<OrderItem>,
  pub created_at: DateTime<Utc>,
}

impl Order {
  /// Snapshots the cart into a pending order
  pub fn from_cart(cart: &Cart) -> Self {
    let id = Uuid::new_v4();
    let items = cart
      .lines
      .iter()
      .enumerate()
      .map(|(index, line)| OrderItem {
        id: Uuid::new_v4(),
        order_id: id,
        item_id: line.item.id,
        company_id: line.item.company_id,
        title: line.item.title.clone(),
        quantity: line.quantity,
        unit_price: line.item.price,
        line_order: index as i32,
      })
      .collect();

    Self {
      id,
      user_id: cart.user_id,
      status: OrderStatus::Pending,
      total_amount: cart.total,
      items,
      created_at: Utc::now(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
  pub id: Uuid,
  pub user_id: Uuid,
  pub order_id: Uuid,
  pub amount: Money,
  pub status: PaymentStatus,
  pub created_at: DateTime<Utc>,
}

impl Payment {
  pub fn new(user_id: Uuid, order_id: Uuid, amount: Money, status: PaymentStatus) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      order_id,
      amount,
      status,
      created_at: Utc::now(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn line(price: rust_decimal::Decimal, quantity: i32) -> CartLine {
    let item = Item::new(
      Uuid::new_v4(),
      "Widget".into(),
      Money::new(price).unwrap(),
      "parts".into(),
    );
    let quantity = Quantity::new(quantity).unwrap();
    CartLine {
      line_total: item.price.times(quantity),
      item,
      quantity,
    }
  }

  #[test]
  fn test_cart_total() {
    let cart = Cart::new(Uuid::new_v4(), vec![line(dec!(100), 2), line(dec!(0.5), 3)]);
    assert_eq!(cart.total.amount(), dec!(201.50));
    assert!(!cart.is_empty());
  }

  #[test]
  fn test_order_snapshots_cart() {
    let cart = Cart::new(Uuid::new_v4(), vec![line(dec!(10), 1), line(dec!(20), 2)]);
    let order = Order::from_cart(&cart);

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount.amount(), dec!(50));
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[1].line_order, 1);
    assert_eq!(order.items[1].line_total().amount(), dec!(40));
    assert!(order.items.iter().all(|i| i.order_id == order.id));
  }
}
