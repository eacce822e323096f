use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Use case for logging out a user
pub struct LogoutUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Invalidates the given session token
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` if the token is unknown
  pub async fn execute(&self, session_token: String) -> Result<(), AuthError> {
    let token = SessionToken::from_string(session_token)?;
    self.auth_service.logout(token).await
  }
}
