use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::Money;

// Company - seller or buyer of ordered goods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
  pub id: Uuid,
  pub name: String,
  pub bin_number: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Company {
  pub fn new(name: String, bin_number: Option<String>) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name,
      bin_number,
      created_at: now,
      updated_at: now,
    }
  }
}

// Item - catalog entry sold by a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
  pub id: Uuid,
  pub company_id: Uuid,
  pub title: String,
  pub price: Money,
  pub category: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Item {
  pub fn new(company_id: Uuid, title: String, price: Money, category: String) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      company_id,
      title,
      price,
      category,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Optional narrowing of the item listing
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
  pub company_id: Option<Uuid>,
  pub category: Option<String>,
}
