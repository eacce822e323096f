use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::catalog::{Money, Quantity};
use crate::domain::commerce::{
  CartItem, CartRepository, CommerceError, Order, OrderItem, OrderRepository, OrderStatus,
  Payment, PaymentRepository,
};

#[derive(Debug, FromRow)]
struct CartItemRow {
  user_id: Uuid,
  item_id: Uuid,
  quantity: i32,
  added_at: DateTime<Utc>,
}

impl TryFrom<CartItemRow> for CartItem {
  type Error = CommerceError;

  fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
    Ok(CartItem {
      user_id: row.user_id,
      item_id: row.item_id,
      quantity: Quantity::new(row.quantity)?,
      added_at: row.added_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct OrderRow {
  id: Uuid,
  user_id: Uuid,
  status: String,
  total_amount: Decimal,
  created_at: DateTime<Utc>,
}

impl OrderRow {
  fn into_order(self, items: Vec<OrderItem>) -> Result<Order, CommerceError> {
    Ok(Order {
      id: self.id,
      user_id: self.user_id,
      status: self.status.parse()?,
      total_amount: Money::new(self.total_amount)?,
      items,
      created_at: self.created_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
  id: Uuid,
  order_id: Uuid,
  item_id: Uuid,
  company_id: Uuid,
  title: String,
  quantity: i32,
  unit_price: Decimal,
  line_order: i32,
}

impl TryFrom<OrderItemRow> for OrderItem {
  type Error = CommerceError;

  fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
    Ok(OrderItem {
      id: row.id,
      order_id: row.order_id,
      item_id: row.item_id,
      company_id: row.company_id,
      title: row.title,
      quantity: Quantity::new(row.quantity)?,
      unit_price: Money::new(row.unit_price)?,
      line_order: row.line_order,
    })
  }
}

#[derive(Debug, FromRow)]
struct PaymentRow {
  id: Uuid,
  user_id: Uuid,
  order_id: Uuid,
  amount: Decimal,
  status: String,
  created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
  type Error = CommerceError;

  fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
    Ok(Payment {
      id: row.id,
      user_id: row.user_id,
      order_id: row.order_id,
      amount: Money::new(row.amount)?,
      status: row.status.parse()?,
      created_at: row.created_at,
    })
  }
}

const ORDER_COLUMNS: &str = "id, user_id, status, total_amount, created_at";
const ORDER_ITEM_COLUMNS: &str =
  "id, order_id, item_id, company_id, title, quantity, unit_price, line_order";

pub struct PostgresCartRepository {
  pool: PgPool,
}

impl PostgresCartRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
  async fn upsert(
    &self,
    user_id: Uuid,
    item_id: Uuid,
    quantity: Quantity,
  ) -> Result<CartItem, CommerceError> {
    let row = sqlx::query_as::<_, CartItemRow>(
      r#"
      INSERT INTO cart_items (user_id, item_id, quantity, added_at)
      VALUES ($1, $2, $3, NOW())
      ON CONFLICT (user_id, item_id) DO UPDATE SET quantity = EXCLUDED.quantity
      RETURNING user_id, item_id, quantity, added_at
      "#,
    )
    .bind(user_id)
    .bind(item_id)
    .bind(quantity.value())
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<bool, CommerceError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND item_id = $2")
      .bind(user_id)
      .bind(item_id)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }

  async fn list(&self, user_id: Uuid) -> Result<Vec<CartItem>, CommerceError> {
    let rows = sqlx::query_as::<_, CartItemRow>(
      r#"
      SELECT user_id, item_id, quantity, added_at
      FROM cart_items
      WHERE user_id = $1
      ORDER BY added_at ASC, item_id ASC
      "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}

pub struct PostgresOrderRepository {
  pool: PgPool,
}

impl PostgresOrderRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn items_for(&self, order_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<OrderItem>>, CommerceError> {
    let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
      "SELECT {} FROM order_items WHERE order_id = ANY($1) ORDER BY line_order ASC",
      ORDER_ITEM_COLUMNS
    ))
    .bind(order_ids)
    .fetch_all(&self.pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for row in rows {
      let item = OrderItem::try_from(row)?;
      grouped.entry(item.order_id).or_default().push(item);
    }
    Ok(grouped)
  }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
  async fn place(&self, order: Order) -> Result<Order, CommerceError> {
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      r#"
      INSERT INTO orders (id, user_id, status, total_amount, created_at)
      VALUES ($1, $2, $3, $4, $5)
      "#,
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.status.as_str())
    .bind(order.total_amount.amount())
    .bind(order.created_at)
    .execute(&mut *tx)
    .await?;

    for item in &order.items {
      sqlx::query(
        r#"
        INSERT INTO order_items (id, order_id, item_id, company_id, title, quantity, unit_price, line_order)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
      )
      .bind(item.id)
      .bind(item.order_id)
      .bind(item.item_id)
      .bind(item.company_id)
      .bind(&item.title)
      .bind(item.quantity.value())
      .bind(item.unit_price.amount())
      .bind(item.line_order)
      .execute(&mut *tx)
      .await?;
    }

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
      .bind(order.user_id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;

    Ok(order)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, CommerceError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
      "SELECT {} FROM orders WHERE id = $1",
      ORDER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    match row {
      Some(row) => {
        let mut items = self.items_for(&[row.id]).await?;
        let items = items.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_order(items)?))
      }
      None => Ok(None),
    }
  }

  async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, CommerceError> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
      "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
      ORDER_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut items = self.items_for(&ids).await?;

    rows
      .into_iter()
      .map(|row| {
        let lines = items.remove(&row.id).unwrap_or_default();
        row.into_order(lines)
      })
      .collect()
  }

  async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), CommerceError> {
    let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
      .bind(id)
      .bind(status.as_str())
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(CommerceError::OrderNotFound(id));
    }
    Ok(())
  }
}

pub struct PostgresPaymentRepository {
  pool: PgPool,
}

impl PostgresPaymentRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
  async fn create(&self, payment: Payment) -> Result<Payment, CommerceError> {
    let row = sqlx::query_as::<_, PaymentRow>(
      r#"
      INSERT INTO payments (id, user_id, order_id, amount, status, created_at)
      VALUES ($1, $2, $3, $4, $5, $6)
      RETURNING id, user_id, order_id, amount, status, created_at
      "#,
    )
    .bind(payment.id)
    .bind(payment.user_id)
    .bind(payment.order_id)
    .bind(payment.amount.amount())
    .bind(payment.status.as_str())
    .bind(payment.created_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Payment>, CommerceError> {
    let rows = sqlx::query_as::<_, PaymentRow>(
      r#"
      SELECT id, user_id, order_id, amount, status, created_at
      FROM payments
      WHERE user_id = $1
      ORDER BY created_at DESC
      "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
