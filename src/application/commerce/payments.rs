use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::commerce::{CommerceError, CommerceService, Payment, PaymentStatus};

#[derive(Debug, Serialize)]
pub struct PaymentDto {
  pub id: Uuid,
  pub order_id: Uuid,
  pub amount: Decimal,
  pub status: String,
  pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
  fn from(payment: Payment) -> Self {
    Self {
      id: payment.id,
      order_id: payment.order_id,
      amount: payment.amount.amount(),
      status: payment.status.as_str().to_string(),
      created_at: payment.created_at,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentCommand {
  pub user_id: Uuid,
  pub order_id: Uuid,
  pub amount: Decimal,
  /// Defaults to `pending`
  pub status: Option<String>,
}

pub struct CreatePaymentUseCase {
  commerce_service: Arc<CommerceService>,
}

impl CreatePaymentUseCase {
  pub fn new(commerce_service: Arc<CommerceService>) -> Self {
    Self { commerce_service }
  }

  pub async fn execute(&self, command: CreatePaymentCommand) -> Result<PaymentDto, CommerceError> {
    let status = match command.status.as_deref() {
      Some(raw) => PaymentStatus::from_str(raw)?,
      None => PaymentStatus::default(),
    };

    let payment = self
      .commerce_service
      .create_payment(command.user_id, command.order_id, command.amount, status)
      .await?;
    Ok(payment.into())
  }
}

pub struct ListPaymentsUseCase {
  commerce_service: Arc<CommerceService>,
}

impl ListPaymentsUseCase {
  pub fn new(commerce_service: Arc<CommerceService>) -> Self {
    Self { commerce_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<Vec<PaymentDto>, CommerceError> {
    let payments = self.commerce_service.list_payments(user_id).await?;
    Ok(payments.into_iter().map(PaymentDto::from).collect())
  }
}
