pub mod auth;
pub mod catalog;
pub mod commerce;
pub mod documents;
pub mod health;
pub mod integrations;
pub mod sync;

use crate::{
  adapters::http::{errors::ApiError, middleware::AuthUser},
  domain::auth::User,
};
use actix_web::HttpRequest;

/// Authenticated user, rejected with 403 unless they are staff
pub fn require_staff(req: &HttpRequest) -> Result<User, ApiError> {
  let user = req.authenticated_user()?;
  if !user.is_staff {
    tracing::warn!(user_id = %user.id, path = %req.path(), "Non-staff user denied");
    return Err(ApiError::Forbidden(
      "This operation is restricted to staff".to_string(),
    ));
  }
  Ok(user)
}
