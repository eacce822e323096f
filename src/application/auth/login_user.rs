use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Bin, Password};

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  pub bin_number: String,
  pub password: String,
}

/// Response after successful user login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  pub user_id: Uuid,
  pub bin_number: String,
  pub email: String,
  pub is_staff: bool,
  pub session_token: String,
  pub expires_at: DateTime<Utc>,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// Malformed BINs and passwords are reported as invalid credentials so the
  /// response does not reveal which part was wrong.
  pub async fn execute(
    &self,
    command: LoginUserCommand,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Result<LoginUserResponse, AuthError> {
    let bin = Bin::new(&command.bin_number).map_err(|_| AuthError::InvalidCredentials)?;
    let password = Password::new(command.password).map_err(|_| AuthError::InvalidCredentials)?;

    let (user, session, session_token) = self
      .auth_service
      .login(bin, password, ip_address, user_agent)
      .await?;

    Ok(LoginUserResponse {
      user_id: user.id,
      bin_number: user.bin_number,
      email: user.email,
      is_staff: user.is_staff,
      session_token: session_token.into_inner(),
      expires_at: session.expires_at,
    })
  }
}
