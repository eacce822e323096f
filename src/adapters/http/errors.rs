use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::catalog::CatalogError;
use crate::domain::commerce::CommerceError;
use crate::domain::document::DocumentError;
use crate::domain::integration::IntegrationError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// 400 Bad Request
  Validation(String),

  /// 401, 409 or 429 depending on the kind
  Auth(AuthErrorKind),

  /// 403 Forbidden
  Forbidden(String),

  /// 404 Not Found
  NotFound(String),

  /// 409 Conflict
  Conflict(String),

  /// 502 Bad Gateway: 1C could not be reached or refused the document
  SyncFailed(String),

  /// 500 Internal Server Error
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  InvalidCredentials,
  InvalidSession,
  InvalidToken,
  RateLimitExceeded,
  BinAlreadyExists,
  EmailAlreadyExists,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::SyncFailed(msg) => write!(f, "Sync failed: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials
        | AuthErrorKind::InvalidSession
        | AuthErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        AuthErrorKind::BinAlreadyExists | AuthErrorKind::EmailAlreadyExists => StatusCode::CONFLICT,
      },
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::SyncFailed(_) => StatusCode::BAD_GATEWAY,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => {
          ("invalid_credentials", "Invalid BIN or password".to_string())
        }
        AuthErrorKind::InvalidSession => {
          ("invalid_session", "Invalid or expired session".to_string())
        }
        AuthErrorKind::InvalidToken => (
          "invalid_token",
          "Invalid or missing authorization token".to_string(),
        ),
        AuthErrorKind::RateLimitExceeded => (
          "rate_limit_exceeded",
          "Too many attempts. Please try again later".to_string(),
        ),
        AuthErrorKind::BinAlreadyExists => (
          "bin_already_exists",
          "An account with this BIN already exists".to_string(),
        ),
        AuthErrorKind::EmailAlreadyExists => (
          "email_already_exists",
          "An account with this email already exists".to_string(),
        ),
      },
      ApiError::Forbidden(msg) => ("forbidden", msg.clone()),
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Conflict(msg) => ("conflict", msg.clone()),
      ApiError::SyncFailed(msg) => {
        tracing::warn!("Sync failed: {}", msg);
        ("sync_failed", msg.clone())
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::BinAlreadyExists => ApiError::Auth(AuthErrorKind::BinAlreadyExists),
      AuthError::EmailAlreadyExists => ApiError::Auth(AuthErrorKind::EmailAlreadyExists),
      AuthError::InvalidSession => ApiError::Auth(AuthErrorKind::InvalidSession),
      AuthError::UserNotFound => ApiError::NotFound(error.to_string()),
      AuthError::ValueObject(err) => ApiError::Validation(err.to_string()),
      AuthError::Repository(err) => match err {
        RepositoryError::NotFound => ApiError::NotFound(err.to_string()),
        RepositoryError::DuplicateKey(_) => ApiError::Conflict(err.to_string()),
        _ => ApiError::Internal(err.to_string()),
      },
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors.iter().map(move |error| {
          error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid field: {}", field))
        })
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

impl From<CatalogError> for ApiError {
  fn from(error: CatalogError) -> Self {
    match error {
      CatalogError::Validation(_) | CatalogError::Identity(_) => {
        ApiError::Validation(error.to_string())
      }
      CatalogError::CompanyNotFound(_) | CatalogError::ItemNotFound(_) => {
        ApiError::NotFound(error.to_string())
      }
      CatalogError::BinAlreadyRegistered(_) => ApiError::Conflict(error.to_string()),
      CatalogError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

impl From<CommerceError> for ApiError {
  fn from(error: CommerceError) -> Self {
    match error {
      CommerceError::Catalog(e) => e.into(),
      CommerceError::Validation(_) | CommerceError::EmptyCart | CommerceError::UnknownStatus(_) => {
        ApiError::Validation(error.to_string())
      }
      CommerceError::CartItemNotFound(_) | CommerceError::OrderNotFound(_) => {
        ApiError::NotFound(error.to_string())
      }
      CommerceError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

impl From<DocumentError> for ApiError {
  fn from(error: DocumentError) -> Self {
    match error {
      DocumentError::Commerce(e) => e.into(),
      DocumentError::Catalog(e) => e.into(),
      DocumentError::Validation(_)
      | DocumentError::Amount(_)
      | DocumentError::EmptyOrder(_)
      | DocumentError::MixedSellers(_) => ApiError::Validation(error.to_string()),
      DocumentError::DocumentNotFound(_)
      | DocumentError::OrderNotFound(_)
      | DocumentError::CompanyNotFound(_) => ApiError::NotFound(error.to_string()),
      DocumentError::DuplicateNumber(_)
      | DocumentError::NotEditable(_)
      | DocumentError::InvalidStatusTransition { .. }
      | DocumentError::CannotDelete(_) => ApiError::Conflict(error.to_string()),
      DocumentError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

impl From<IntegrationError> for ApiError {
  fn from(error: IntegrationError) -> Self {
    match error {
      IntegrationError::Document(e) => e.into(),
      IntegrationError::Catalog(e) => e.into(),
      IntegrationError::Transport(e) => ApiError::SyncFailed(e.to_string()),
      IntegrationError::Validation(_)
      | IntegrationError::ImportNotSupported(_)
      | IntegrationError::EmptyBatch
      | IntegrationError::BatchTooLarge { .. } => ApiError::Validation(error.to_string()),
      IntegrationError::IntegrationNotFound(_) => ApiError::NotFound(error.to_string()),
      IntegrationError::NoActiveIntegration
      | IntegrationError::IntegrationInactive(_)
      | IntegrationError::CannotDelete(_)
      | IntegrationError::NotExportable(_) => ApiError::Conflict(error.to_string()),
      IntegrationError::Credentials(e) => ApiError::Internal(e.to_string()),
      IntegrationError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::integration::TransportError;
  use uuid::Uuid;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidCredentials).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::BinAlreadyExists).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Forbidden("staff only".into()).status_code(),
      StatusCode::FORBIDDEN
    );
    assert_eq!(
      ApiError::SyncFailed("503".into()).status_code(),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_domain_error_conversion() {
    let api_error: ApiError = AuthError::InvalidCredentials.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = DocumentError::DocumentNotFound(Uuid::new_v4()).into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError = DocumentError::Commerce(CommerceError::EmptyCart).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError = IntegrationError::NoActiveIntegration.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError =
      IntegrationError::Transport(TransportError::Timeout(30)).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_GATEWAY);
  }

  #[actix_web::test]
  async fn test_error_body_shape() {
    let response = ApiError::NotFound("Document not found".into()).error_response();
    let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(value["error"], "not_found");
    assert_eq!(value["message"], "Document not found");
    assert!(value.get("details").is_none());
  }

  #[actix_web::test]
  async fn test_internal_details_are_hidden() {
    let response = ApiError::Internal("password=hunter2".into()).error_response();
    let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
    assert!(!String::from_utf8_lossy(&body).contains("hunter2"));
  }
}
