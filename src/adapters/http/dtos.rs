use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  /// 12-digit business identification number
  #[validate(length(equal = 12, message = "BIN must be exactly 12 digits"))]
  pub bin_number: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  #[validate(length(min = 1, message = "BIN is required"))]
  pub bin_number: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Response after registration or login
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
  pub user_id: Uuid,
  pub bin_number: String,
  pub email: String,
  pub is_staff: bool,

  /// Bearer token for the Authorization header
  pub session_token: String,

  pub expires_at: DateTime<Utc>,
}

/// Response containing current user information
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
  pub user_id: Uuid,
  pub bin_number: String,
  pub email: String,
  pub is_verified: bool,
  pub is_staff: bool,
  pub created_at: DateTime<Utc>,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

// Catalog

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompanyRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Company name must be between 1 and 255 characters"
  ))]
  pub name: String,

  pub bin_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItemRequest {
  pub company_id: Uuid,

  #[validate(length(
    min = 1,
    max = 255,
    message = "Title must be between 1 and 255 characters"
  ))]
  pub title: String,

  pub price: Decimal,

  #[serde(default)]
  #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
  pub category: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemQuery {
  pub company_id: Option<Uuid>,
  pub category: Option<String>,
}

// Commerce

#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartRequest {
  pub item_id: Uuid,
  #[serde(default = "default_quantity")]
  pub quantity: i32,
}

fn default_quantity() -> i32 {
  1
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoveFromCartRequest {
  pub item_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
  pub order_id: Uuid,
  pub amount: Decimal,
  pub status: Option<String>,
}

// Documents

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocumentRequest {
  pub order_id: Uuid,

  /// invoice, waybill, act or receipt
  pub document_type: String,

  pub buyer_company_id: Uuid,

  /// Defaults to today
  pub document_date: Option<NaiveDate>,

  pub due_date: Option<NaiveDate>,

  /// Overrides the configured VAT rate (percent)
  pub vat_rate: Option<Decimal>,

  #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
  pub due_date: Option<NaiveDate>,

  #[serde(default)]
  #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
  pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
  pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
  pub document_type: Option<String>,
  pub status: Option<String>,
}

// Sync

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRequest {
  pub integration_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkExportRequest {
  #[validate(length(min = 1, message = "Select at least one document"))]
  pub document_ids: Vec<Uuid>,

  pub integration_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncLogQuery {
  pub document_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IntegrationRequest {
  #[validate(length(
    min = 1,
    max = 100,
    message = "Name must be between 1 and 100 characters"
  ))]
  pub name: String,

  /// webservice, file_export or hybrid
  pub integration_type: String,

  #[validate(url(message = "Endpoint must be a valid URL"))]
  pub endpoint_url: Option<String>,

  pub username: Option<String>,
  pub password: Option<String>,
  pub export_path: Option<String>,
  pub import_path: Option<String>,
  pub file_format: Option<String>,

  #[serde(default)]
  pub auto_sync: bool,

  #[validate(range(min = 1, message = "Sync interval must be positive"))]
  pub sync_interval_minutes: Option<i32>,

  #[serde(default = "default_active")]
  pub is_active: bool,
}

fn default_active() -> bool {
  true
}
