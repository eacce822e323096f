use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{
  DocumentNumber, DocumentStatus, DocumentType, VatBreakdown, VatRate, calculate_vat,
};
use crate::domain::catalog::{Money, Quantity};
use crate::domain::commerce::OrderItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessDocument {
  pub id: Uuid,
  pub owner_id: Uuid,
  pub document_type: DocumentType,
  pub order_id: Uuid,
  pub seller_company_id: Uuid,
  pub buyer_company_id: Uuid,
  pub document_number: DocumentNumber,
  pub document_date: NaiveDate,
  pub due_date: Option<NaiveDate>,
  pub subtotal: Money,
  pub vat_rate: VatRate,
  pub vat_amount: Money,
  pub total_amount: Money,
  pub status: DocumentStatus,
  pub notes: String,
  pub external_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Everything needed to persist a new draft
pub struct NewDocument {
  pub owner_id: Uuid,
  pub document_type: DocumentType,
  pub order_id: Uuid,
  pub seller_company_id: Uuid,
  pub buyer_company_id: Uuid,
  pub document_number: DocumentNumber,
  pub document_date: NaiveDate,
  pub due_date: Option<NaiveDate>,
  pub vat_rate: VatRate,
  pub notes: String,
}

impl BusinessDocument {
  /// Builds a draft together with its lines, copying `order_items` in order
  pub fn draft(data: NewDocument, order_items: &[OrderItem]) -> (Self, Vec<DocumentItem>) {
    let id = Uuid::new_v4();
    let mut sorted: Vec<&OrderItem> = order_items.iter().collect();
    sorted.sort_by_key(|item| item.line_order);

    let items: Vec<DocumentItem> = sorted
      .into_iter()
      .enumerate()
      .map(|(index, item)| {
        DocumentItem::new(
          id,
          Some(item.item_id),
          item.title.clone(),
          item.quantity,
          item.unit_price,
          index as i32,
        )
      })
      .collect();

    let totals = DocumentItem::subtotal(&items);
    let breakdown = calculate_vat(totals, data.vat_rate);
    let now = Utc::now();

    let document = Self {
      id,
      owner_id: data.owner_id,
      document_type: data.document_type,
      order_id: data.order_id,
      seller_company_id: data.seller_company_id,
      buyer_company_id: data.buyer_company_id,
      document_number: data.document_number,
      document_date: data.document_date,
      due_date: data.due_date,
      subtotal: breakdown.subtotal,
      vat_rate: data.vat_rate,
      vat_amount: breakdown.vat_amount,
      total_amount: breakdown.total_amount,
      status: DocumentStatus::Draft,
      notes: data.notes,
      external_id: None,
      created_at: now,
      updated_at: now,
    };

    (document, items)
  }

  pub fn breakdown(&self) -> VatBreakdown {
    VatBreakdown {
      subtotal: self.subtotal,
      vat_amount: self.vat_amount,
      total_amount: self.total_amount,
    }
  }

  pub fn is_owned_by(&self, user_id: Uuid) -> bool {
    self.owner_id == user_id
  }

  /// Applies a status change if the transition is allowed
  pub fn transition_to(&mut self, status: DocumentStatus) -> bool {
    if !self.status.can_transition_to(status) {
      return false;
    }
    self.status = status;
    self.updated_at = Utc::now();
    true
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentItem {
  pub id: Uuid,
  pub document_id: Uuid,
  pub item_id: Option<Uuid>,
  pub title: String,
  pub quantity: Quantity,
  pub unit_price: Money,
  pub total_price: Money,
  pub line_order: i32,
}

impl DocumentItem {
  pub fn new(
    document_id: Uuid,
    item_id: Option<Uuid>,
    title: String,
    quantity: Quantity,
    unit_price: Money,
    line_order: i32,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      document_id,
      item_id,
      title,
      quantity,
      unit_price,
      total_price: unit_price.times(quantity),
      line_order,
    }
  }

  pub fn subtotal(items: &[DocumentItem]) -> Money {
    items
      .iter()
      .fold(Money::zero(), |acc, item| acc.add(&item.total_price))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
  pub document_type: Option<DocumentType>,
  pub status: Option<DocumentStatus>,
}
