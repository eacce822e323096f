use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{CartItem, Order, Payment};
use super::errors::CommerceError;
use super::value_objects::OrderStatus;
use crate::domain::catalog::Quantity;

#[async_trait]
pub trait CartRepository: Send + Sync {
  /// Inserts the cart row or replaces its quantity
  async fn upsert(
    &self,
    user_id: Uuid,
    item_id: Uuid,
    quantity: Quantity,
  ) -> Result<CartItem, CommerceError>;
  /// Returns false when the item was not in the cart
  async fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<bool, CommerceError>;
  async fn list(&self, user_id: Uuid) -> Result<Vec<CartItem>, CommerceError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
  /// Persists the order with its items and empties the owner's cart atomically
  async fn place(&self, order: Order) -> Result<Order, CommerceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, CommerceError>;
  async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, CommerceError>;
  async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), CommerceError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
  async fn create(&self, payment: Payment) -> Result<Payment, CommerceError>;
  async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Payment>, CommerceError>;
}
