use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::CommerceError;

// Order Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Pending,
  Paid,
  Cancelled,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Paid => "paid",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl FromStr for OrderStatus {
  type Err = CommerceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "pending" => Ok(OrderStatus::Pending),
      "paid" => Ok(OrderStatus::Paid),
      "cancelled" => Ok(OrderStatus::Cancelled),
      _ => Err(CommerceError::UnknownStatus(s.to_string())),
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Payment Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  #[default]
  Pending,
  Completed,
  Failed,
}

impl PaymentStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentStatus::Pending => "pending",
      PaymentStatus::Completed => "completed",
      PaymentStatus::Failed => "failed",
    }
  }
}

impl FromStr for PaymentStatus {
  type Err = CommerceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "pending" => Ok(PaymentStatus::Pending),
      "completed" => Ok(PaymentStatus::Completed),
      "failed" => Ok(PaymentStatus::Failed),
      _ => Err(CommerceError::UnknownStatus(s.to_string())),
    }
  }
}
