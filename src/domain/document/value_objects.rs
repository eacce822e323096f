use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::catalog::Money;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid document number: {0}")]
  InvalidDocumentNumber(String),
  #[error("Unknown document type: {0}")]
  UnknownDocumentType(String),
  #[error("Unknown document status: {0}")]
  UnknownStatus(String),
  #[error("Invalid VAT rate: {0}")]
  InvalidVatRate(String),
  #[error("Invalid number prefix: {0}")]
  InvalidPrefix(String),
}

// Document Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
  Invoice,
  Act,
  Waybill,
  TaxInvoice,
  TaxReport,
}

impl DocumentType {
  pub const ALL: [DocumentType; 5] = [
    DocumentType::Invoice,
    DocumentType::Act,
    DocumentType::Waybill,
    DocumentType::TaxInvoice,
    DocumentType::TaxReport,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      DocumentType::Invoice => "invoice",
      DocumentType::Act => "act",
      DocumentType::Waybill => "waybill",
      DocumentType::TaxInvoice => "tax_invoice",
      DocumentType::TaxReport => "tax_report",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      DocumentType::Invoice => "Invoice",
      DocumentType::Act => "Act of Completed Work",
      DocumentType::Waybill => "Waybill",
      DocumentType::TaxInvoice => "Tax Invoice",
      DocumentType::TaxReport => "Tax Report",
    }
  }

  /// Name of the matching 1C:Enterprise document object
  pub fn onec_object_name(&self) -> &'static str {
    match self {
      DocumentType::Invoice => "Счет",
      DocumentType::Act => "АктВыполненныхРабот",
      DocumentType::Waybill => "ТоварнаяНакладная",
      DocumentType::TaxInvoice => "СчетФактура",
      DocumentType::TaxReport => "НалоговаяОтчетность",
    }
  }
}

impl FromStr for DocumentType {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    DocumentType::ALL
      .into_iter()
      .find(|t| t.as_str() == s.trim().to_lowercase())
      .ok_or_else(|| ValueObjectError::UnknownDocumentType(s.to_string()))
  }
}

impl fmt::Display for DocumentType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Document number prefixes per type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberPrefixes {
  pub invoice: String,
  pub act: String,
  pub waybill: String,
  pub tax_invoice: String,
  pub tax_report: String,
}

impl Default for NumberPrefixes {
  fn default() -> Self {
    Self {
      invoice: "INV".to_string(),
      act: "ACT".to_string(),
      waybill: "WAY".to_string(),
      tax_invoice: "TAX".to_string(),
      tax_report: "REP".to_string(),
    }
  }
}

impl NumberPrefixes {
  pub fn for_type(&self, document_type: DocumentType) -> &str {
    match document_type {
      DocumentType::Invoice => &self.invoice,
      DocumentType::Act => &self.act,
      DocumentType::Waybill => &self.waybill,
      DocumentType::TaxInvoice => &self.tax_invoice,
      DocumentType::TaxReport => &self.tax_report,
    }
  }

  /// Prefixes must be distinct, non-empty uppercase ASCII without dashes
  pub fn validate(&self) -> Result<(), ValueObjectError> {
    let mut seen: Vec<(DocumentType, &str)> = Vec::new();
    for document_type in DocumentType::ALL {
      let prefix = self.for_type(document_type);
      let valid = !prefix.is_empty()
        && prefix
          .chars()
          .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
      if !valid {
        return Err(ValueObjectError::InvalidPrefix(format!(
          "{} prefix '{}'",
          document_type, prefix
        )));
      }
      // Shared prefixes would give two sequences the same numbers
      if let Some((other, _)) = seen.iter().find(|(_, p)| *p == prefix) {
        return Err(ValueObjectError::InvalidPrefix(format!(
          "{} and {} share prefix '{}'",
          other, document_type, prefix
        )));
      }
      seen.push((document_type, prefix));
    }
    Ok(())
  }
}

// Document Number - PREFIX-YYYY-MM-NNNN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNumber(String);

impl DocumentNumber {
  pub const MAX_LENGTH: usize = 50;

  /// Formats the `sequence`-th number of the period containing `date`
  pub fn format(prefix: &str, date: NaiveDate, sequence: i64) -> Self {
    Self(format!(
      "{}-{:04}-{:02}-{:04}",
      prefix,
      date.year(),
      date.month(),
      sequence
    ))
  }

  /// Parses a stored or user-supplied number
  pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    let invalid = || ValueObjectError::InvalidDocumentNumber(value.to_string());

    if trimmed.is_empty() || trimmed.len() > Self::MAX_LENGTH {
      return Err(invalid());
    }

    let parts: Vec<&str> = trimmed.split('-').collect();
    let [prefix, year, month, sequence] = parts.as_slice() else {
      return Err(invalid());
    };

    let numeric = |s: &str, len: usize| s.len() >= len && s.chars().all(|c| c.is_ascii_digit());
    if prefix.is_empty() || year.len() != 4 || !numeric(year, 4) || !numeric(month, 2) {
      return Err(invalid());
    }
    if month.len() != 2 || !(1..=12).contains(&month.parse::<u32>().map_err(|_| invalid())?) {
      return Err(invalid());
    }
    if !numeric(sequence, 4) {
      return Err(invalid());
    }

    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for DocumentNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Document Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
  Draft,
  Sent,
  Confirmed,
  Paid,
  Cancelled,
}

impl DocumentStatus {
  pub fn can_transition_to(&self, new_status: DocumentStatus) -> bool {
    matches!(
      (self, new_status),
      (DocumentStatus::Draft, DocumentStatus::Sent)
        | (DocumentStatus::Draft, DocumentStatus::Cancelled)
        | (DocumentStatus::Sent, DocumentStatus::Confirmed)
        | (DocumentStatus::Sent, DocumentStatus::Cancelled)
        | (DocumentStatus::Confirmed, DocumentStatus::Paid)
        | (DocumentStatus::Confirmed, DocumentStatus::Cancelled)
    )
  }

  pub fn is_editable(&self) -> bool {
    matches!(self, DocumentStatus::Draft)
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, DocumentStatus::Paid | DocumentStatus::Cancelled)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      DocumentStatus::Draft => "draft",
      DocumentStatus::Sent => "sent",
      DocumentStatus::Confirmed => "confirmed",
      DocumentStatus::Paid => "paid",
      DocumentStatus::Cancelled => "cancelled",
    }
  }
}

impl FromStr for DocumentStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "draft" => Ok(DocumentStatus::Draft),
      "sent" => Ok(DocumentStatus::Sent),
      "confirmed" => Ok(DocumentStatus::Confirmed),
      "paid" => Ok(DocumentStatus::Paid),
      "cancelled" => Ok(DocumentStatus::Cancelled),
      _ => Err(ValueObjectError::UnknownStatus(s.to_string())),
    }
  }
}

impl fmt::Display for DocumentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// VAT Rate - percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct VatRate(Decimal);

impl VatRate {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO || value > Decimal::from(100) {
      return Err(ValueObjectError::InvalidVatRate(
        "VAT rate must be between 0 and 100".to_string(),
      ));
    }
    if value.normalize().scale() > 2 {
      return Err(ValueObjectError::InvalidVatRate(
        "VAT rate cannot have more than 2 decimal places".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }

  pub fn as_multiplier(&self) -> Decimal {
    self.0 / Decimal::from(100)
  }
}

impl TryFrom<Decimal> for VatRate {
  type Error = ValueObjectError;

  fn try_from(value: Decimal) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<VatRate> for Decimal {
  fn from(rate: VatRate) -> Self {
    rate.0
  }
}

/// VAT and VAT-inclusive total for a subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VatBreakdown {
  pub subtotal: Money,
  pub vat_amount: Money,
  pub total_amount: Money,
}

/// `vat = round(subtotal * rate / 100, 2)` and `total = subtotal + vat`
pub fn calculate_vat(subtotal: Money, rate: VatRate) -> VatBreakdown {
  let vat_amount = Money::new(subtotal.amount() * rate.as_multiplier()).unwrap_or_else(|_| Money::zero());
  VatBreakdown {
    subtotal,
    vat_amount,
    total_amount: subtotal.add(&vat_amount),
  }
}
