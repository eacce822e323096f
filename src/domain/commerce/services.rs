use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Cart, CartLine, Order, Payment};
use super::errors::CommerceError;
use super::ports::{CartRepository, OrderRepository, PaymentRepository};
use super::value_objects::{OrderStatus, PaymentStatus};
use crate::domain::catalog::{CatalogError, ItemRepository, Money, Quantity};

pub struct CommerceService {
  cart_repo: Arc<dyn CartRepository>,
  order_repo: Arc<dyn OrderRepository>,
  payment_repo: Arc<dyn PaymentRepository>,
  item_repo: Arc<dyn ItemRepository>,
}

impl CommerceService {
  pub fn new(
    cart_repo: Arc<dyn CartRepository>,
    order_repo: Arc<dyn OrderRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    item_repo: Arc<dyn ItemRepository>,
  ) -> Self {
    Self {
      cart_repo,
      order_repo,
      payment_repo,
      item_repo,
    }
  }

  // Cart operations
  pub async fn get_cart(&self, user_id: Uuid) -> Result<Cart, CommerceError> {
    let rows = self.cart_repo.list(user_id).await?;

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
      match self.item_repo.find_by_id(row.item_id).await? {
        Some(item) => lines.push(CartLine {
          line_total: item.price.times(row.quantity),
          item,
          quantity: row.quantity,
        }),
        None => tracing::warn!(item_id = %row.item_id, "Cart references a missing item"),
      }
    }

    Ok(Cart::new(user_id, lines))
  }

  /// Adds an item to the cart, replacing the quantity if it is already there
  pub async fn add_to_cart(
    &self,
    user_id: Uuid,
    item_id: Uuid,
    quantity: i32,
  ) -> Result<Cart, CommerceError> {
    let quantity = Quantity::new(quantity)?;

    self
      .item_repo
      .find_by_id(item_id)
      .await?
      .ok_or(CatalogError::ItemNotFound(item_id))?;

    self.cart_repo.upsert(user_id, item_id, quantity).await?;
    self.get_cart(user_id).await
  }

  pub async fn remove_from_cart(&self, user_id: Uuid, item_id: Uuid) -> Result<Cart, CommerceError> {
    if !self.cart_repo.remove(user_id, item_id).await? {
      return Err(CommerceError::CartItemNotFound(item_id));
    }
    self.get_cart(user_id).await
  }

  // Order operations
  pub async fn create_order(&self, user_id: Uuid) -> Result<Order, CommerceError> {
    let cart = self.get_cart(user_id).await?;
    if cart.is_empty() {
      return Err(CommerceError::EmptyCart);
    }

    let order = self.order_repo.place(Order::from_cart(&cart)).await?;
    tracing::info!(
      order_id = %order.id,
      total = %order.total_amount,
      "Order placed"
    );
    Ok(order)
  }

  pub async fn list_orders(&self, user_id: Uuid) -> Result<Vec<Order>, CommerceError> {
    self.order_repo.list_by_user(user_id).await
  }

  /// Returns the order if it belongs to `user_id`
  pub async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> Result<Order, CommerceError> {
    self
      .order_repo
      .find_by_id(order_id)
      .await?
      .filter(|order| order.user_id == user_id)
      .ok_or(CommerceError::OrderNotFound(order_id))
  }

  // Payment operations
  pub async fn create_payment(
    &self,
    user_id: Uuid,
    order_id: Uuid,
    amount: Decimal,
    status: PaymentStatus,
  ) -> Result<Payment, CommerceError> {
    let amount = Money::new(amount)?;
    let order = self.get_order(user_id, order_id).await?;

    let payment = self
      .payment_repo
      .create(Payment::new(user_id, order.id, amount, status))
      .await?;

    if status == PaymentStatus::Completed
      && order.status == OrderStatus::Pending
      && amount >= order.total_amount
    {
      self
        .order_repo
        .update_status(order.id, OrderStatus::Paid)
        .await?;
      tracing::info!(order_id = %order.id, "Order paid in full");
    }

    Ok(payment)
  }

  pub async fn list_payments(&self, user_id: Uuid) -> Result<Vec<Payment>, CommerceError> {
    self.payment_repo.list_by_user(user_id).await
  }
}
