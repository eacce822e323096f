use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Bin, Email, Password};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// Company BIN, spaces and dashes allowed
  pub bin_number: String,
  pub email: String,
  /// Plain text, will be hashed
  pub password: String,
}

/// Response after successful user registration
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  pub user_id: Uuid,
  pub bin_number: String,
  pub email: String,
  pub is_staff: bool,
  /// Session token for immediate login
  pub session_token: String,
  pub expires_at: DateTime<Utc>,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user registration use case
  ///
  /// # Errors
  /// Returns `AuthError` if registration fails (invalid BIN checksum, BIN or
  /// email already taken, password outside the allowed length)
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    let bin = Bin::new(&command.bin_number)?;
    let email = Email::new(command.email)?;
    let password = Password::with_min_length(
      command.password,
      self.auth_service.config().password_min_length,
    )?;

    let (user, session, session_token) = self.auth_service.register(bin, email, password).await?;

    Ok(RegisterUserResponse {
      user_id: user.id,
      bin_number: user.bin_number,
      email: user.email,
      is_staff: user.is_staff,
      session_token: session_token.into_inner(),
      expires_at: session.expires_at,
    })
  }
}
