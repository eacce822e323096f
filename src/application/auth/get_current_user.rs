use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Response containing current user information
#[derive(Debug, Clone)]
pub struct GetCurrentUserResponse {
  pub user_id: Uuid,
  pub bin_number: String,
  pub email: String,
  pub is_verified: bool,
  pub is_staff: bool,
  pub created_at: DateTime<Utc>,
}

/// Use case for resolving the user behind a session token
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError` if the token is malformed, unknown or expired
  pub async fn execute(&self, session_token: String) -> Result<GetCurrentUserResponse, AuthError> {
    let token = SessionToken::from_string(session_token)?;
    let user = self.auth_service.validate_session(token).await?;

    Ok(GetCurrentUserResponse {
      user_id: user.id,
      bin_number: user.bin_number,
      email: user.email,
      is_verified: user.is_verified,
      is_staff: user.is_staff,
      created_at: user.created_at,
    })
  }
}
