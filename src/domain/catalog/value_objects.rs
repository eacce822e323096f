use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid name: {0}")]
  InvalidName(String),
}

// Money - tenge amount, two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
  pub const SCALE: u32 = 2;

  pub fn new(amount: Decimal) -> Result<Self, ValueObjectError> {
    if amount.is_sign_negative() && !amount.is_zero() {
      return Err(ValueObjectError::InvalidAmount(
        "Amount cannot be negative".to_string(),
      ));
    }
    Ok(Self(Self::round(amount)))
  }

  pub fn zero() -> Self {
    Self(Decimal::new(0, Self::SCALE))
  }

  pub fn amount(&self) -> Decimal {
    self.0
  }

  pub fn add(&self, other: &Money) -> Money {
    Money(self.0 + other.0)
  }

  /// Line total for `quantity` units at this price
  pub fn times(&self, quantity: Quantity) -> Money {
    Money(Self::round(self.0 * Decimal::from(quantity.value())))
  }

  /// Rounds half away from zero to two places
  pub fn round(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(Self::SCALE);
    rounded
  }
}

impl TryFrom<Decimal> for Money {
  type Error = ValueObjectError;

  fn try_from(value: Decimal) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<Money> for Decimal {
  fn from(money: Money) -> Self {
    money.0
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.2} KZT", self.0)
  }
}

// Quantity - whole units, at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
  pub fn new(value: i32) -> Result<Self, ValueObjectError> {
    if value < 1 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be at least 1".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> i32 {
    self.0
  }
}

impl TryFrom<i32> for Quantity {
  type Error = ValueObjectError;

  fn try_from(value: i32) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<Quantity> for i32 {
  fn from(quantity: Quantity) -> Self {
    quantity.0
  }
}

/// Trimmed, non-empty display name of at most `max` characters
pub fn display_name(value: &str, field: &str, max: usize) -> Result<String, ValueObjectError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ValueObjectError::InvalidName(format!(
      "{} cannot be empty",
      field
    )));
  }
  if trimmed.chars().count() > max {
    return Err(ValueObjectError::InvalidName(format!(
      "{} cannot exceed {} characters",
      field, max
    )));
  }
  Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_money_rejects_negative() {
    assert!(Money::new(dec!(-0.01)).is_err());
    assert_eq!(Money::new(dec!(0)).unwrap(), Money::zero());
  }

  #[test]
  fn test_money_rounds_half_away_from_zero() {
    assert_eq!(Money::new(dec!(10.005)).unwrap().amount(), dec!(10.01));
    assert_eq!(Money::new(dec!(10.004)).unwrap().amount(), dec!(10.00));
    assert_eq!(Money::new(dec!(7)).unwrap().amount().to_string(), "7.00");
  }

  #[test]
  fn test_money_times_quantity() {
    let price = Money::new(dec!(1499.99)).unwrap();
    let total = price.times(Quantity::new(3).unwrap());
    assert_eq!(total.amount(), dec!(4499.97));
    assert_eq!(total.to_string(), "4499.97 KZT");
  }

  #[test]
  fn test_quantity() {
    assert!(Quantity::new(0).is_err());
    assert!(Quantity::new(-2).is_err());
    assert_eq!(Quantity::new(5).unwrap().value(), 5);
    assert!(serde_json::from_str::<Quantity>("0").is_err());
  }

  #[test]
  fn test_display_name() {
    assert_eq!(display_name("  Acme  ", "Name", 10).unwrap(), "Acme");
    assert!(display_name("   ", "Name", 10).is_err());
    assert!(display_name("abcdefghijk", "Name", 10).is_err());
  }
}
