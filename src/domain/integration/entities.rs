use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{ConfirmationStatus, FileFormat, IntegrationType, SyncStatus, SyncType};
use crate::domain::catalog::Company;
use crate::domain::document::{BusinessDocument, DocumentItem};

/// Connection settings for one 1C:Enterprise instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
  pub id: Uuid,
  pub name: String,
  pub integration_type: IntegrationType,
  pub endpoint_url: Option<String>,
  pub username: String,
  /// Encrypted at rest, empty when no password is set
  #[serde(skip_serializing)]
  pub password_encrypted: String,
  pub export_path: String,
  pub import_path: String,
  pub file_format: FileFormat,
  pub auto_sync: bool,
  pub sync_interval_minutes: i32,
  pub last_sync: Option<DateTime<Utc>>,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Validated integration fields supplied on create or update
#[derive(Debug, Clone)]
pub struct IntegrationSettings {
  pub name: String,
  pub integration_type: IntegrationType,
  pub endpoint_url: Option<String>,
  pub username: String,
  /// Already encrypted; `None` keeps the stored password on update
  pub password_encrypted: Option<String>,
  pub export_path: String,
  pub import_path: String,
  pub file_format: FileFormat,
  pub auto_sync: bool,
  pub sync_interval_minutes: i32,
  pub is_active: bool,
}

impl Integration {
  pub fn new(settings: IntegrationSettings) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name: settings.name,
      integration_type: settings.integration_type,
      endpoint_url: settings.endpoint_url,
      username: settings.username,
      password_encrypted: settings.password_encrypted.unwrap_or_default(),
      export_path: settings.export_path,
      import_path: settings.import_path,
      file_format: settings.file_format,
      auto_sync: settings.auto_sync,
      sync_interval_minutes: settings.sync_interval_minutes,
      last_sync: None,
      is_active: settings.is_active,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn apply(&mut self, settings: IntegrationSettings) {
    self.name = settings.name;
    self.integration_type = settings.integration_type;
    self.endpoint_url = settings.endpoint_url;
    self.username = settings.username;
    if let Some(password_encrypted) = settings.password_encrypted {
      self.password_encrypted = password_encrypted;
    }
    self.export_path = settings.export_path;
    self.import_path = settings.import_path;
    self.file_format = settings.file_format;
    self.auto_sync = settings.auto_sync;
    self.sync_interval_minutes = settings.sync_interval_minutes;
    self.is_active = settings.is_active;
    self.updated_at = Utc::now();
  }
}

// Sync Log - one row per delivery or import attempt, never updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLog {
  pub id: Uuid,
  pub document_id: Uuid,
  pub integration_id: Uuid,
  pub sync_type: SyncType,
  pub status: SyncStatus,
  pub message: String,
  pub response_data: Option<serde_json::Value>,
  pub duration_ms: i64,
  pub created_at: DateTime<Utc>,
}

impl SyncLog {
  pub fn record(
    document_id: Uuid,
    integration_id: Uuid,
    sync_type: SyncType,
    status: SyncStatus,
    message: impl Into<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      document_id,
      integration_id,
      sync_type,
      status,
      message: message.into(),
      response_data: None,
      duration_ms: 0,
      created_at: Utc::now(),
    }
  }

  pub fn with_response(mut self, response_data: Option<serde_json::Value>) -> Self {
    self.response_data = response_data;
    self
  }

  pub fn with_duration(mut self, duration_ms: i64) -> Self {
    self.duration_ms = duration_ms;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyPayload {
  pub name: String,
  pub bin: Option<String>,
}

impl From<&Company> for PartyPayload {
  fn from(company: &Company) -> Self {
    Self {
      name: company.name.clone(),
      bin: company.bin_number.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
  pub line: i32,
  pub title: String,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub total_price: Decimal,
}

/// The document as handed to 1C
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
  pub document_id: Uuid,
  pub document_type: String,
  pub onec_object: String,
  pub document_number: String,
  pub document_date: NaiveDate,
  pub due_date: Option<NaiveDate>,
  pub company_seller: PartyPayload,
  pub company_buyer: PartyPayload,
  pub items: Vec<ItemPayload>,
  pub subtotal: Decimal,
  pub vat_rate: Decimal,
  pub vat_amount: Decimal,
  pub total_amount: Decimal,
  pub notes: String,
  pub export_timestamp: DateTime<Utc>,
}

impl ExportPayload {
  pub fn build(
    document: &BusinessDocument,
    items: &[DocumentItem],
    seller: &Company,
    buyer: &Company,
  ) -> Self {
    let mut items: Vec<&DocumentItem> = items.iter().collect();
    items.sort_by_key(|item| item.line_order);

    Self {
      document_id: document.id,
      document_type: document.document_type.as_str().to_string(),
      onec_object: document.document_type.onec_object_name().to_string(),
      document_number: document.document_number.value().to_string(),
      document_date: document.document_date,
      due_date: document.due_date,
      company_seller: seller.into(),
      company_buyer: buyer.into(),
      items: items
        .into_iter()
        .map(|item| ItemPayload {
          line: item.line_order + 1,
          title: item.title.clone(),
          quantity: item.quantity.value(),
          unit_price: item.unit_price.amount(),
          total_price: item.total_price.amount(),
        })
        .collect(),
      subtotal: document.subtotal.amount(),
      vat_rate: document.vat_rate.value(),
      vat_amount: document.vat_amount.amount(),
      total_amount: document.total_amount.amount(),
      notes: document.notes.clone(),
      export_timestamp: Utc::now(),
    }
  }

  /// `<number>_<type>_<seller>` without extension
  ///
  /// Numbers restart per seller, so the seller BIN (or the document id when
  /// the seller has none) keeps files of different sellers apart.
  pub fn file_stem(&self) -> String {
    let seller = match self.company_seller.bin.as_deref() {
      Some(bin) if !bin.is_empty() => bin.to_string(),
      _ => self.document_id.simple().to_string(),
    };
    format!("{}_{}_{}", self.document_number, self.document_type, seller)
  }
}

/// Result of a successful hand-off to a transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReceipt {
  pub status: SyncStatus,
  pub message: String,
  pub external_id: Option<String>,
  pub file_path: Option<String>,
  pub response_data: Option<serde_json::Value>,
}

/// Status line reported back by 1C for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
  pub document_number: String,
  #[serde(default)]
  pub seller_bin: Option<String>,
  pub status: ConfirmationStatus,
  #[serde(default)]
  pub external_id: Option<String>,
  #[serde(default)]
  pub message: Option<String>,
}

/// Confirmations read from one import file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationFile {
  pub source: String,
  pub confirmations: Vec<Confirmation>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfirmationBatch {
  pub files: Vec<ConfirmationFile>,
  /// Files that could not be parsed, with the reason
  pub unreadable: Vec<(String, String)>,
}
