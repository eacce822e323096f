use chrono::Duration;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use super::entities::{Session, User};
use super::errors::{AuthError, RepositoryError};
use super::ports::{PasswordHasher, SessionRepository, UserRepository};
use super::value_objects::{Bin, Email, Password, PasswordHash, SessionToken};

/// Tunables for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  pub session_ttl_seconds: i64,
  pub password_min_length: usize,
  /// BINs that are granted staff rights on registration
  pub staff_bins: Vec<String>,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      session_ttl_seconds: 86_400,
      password_min_length: Password::DEFAULT_MIN_LENGTH,
      staff_bins: Vec::new(),
    }
  }
}

/// Authentication service implementing core business logic
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  session_repo: Arc<dyn SessionRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  config: AuthServiceConfig,
  staff_bins: HashSet<String>,
}

impl AuthService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    config: AuthServiceConfig,
  ) -> Self {
    let staff_bins = config
      .staff_bins
      .iter()
      .filter_map(|raw| match Bin::new(raw) {
        Ok(bin) => Some(bin.into_inner()),
        Err(e) => {
          tracing::warn!("Ignoring staff BIN from configuration: {}", e);
          None
        }
      })
      .collect();

    Self {
      user_repo,
      session_repo,
      password_hasher,
      config,
      staff_bins,
    }
  }

  pub fn config(&self) -> &AuthServiceConfig {
    &self.config
  }

  /// Registers a new user and opens a first session
  ///
  /// # Errors
  /// Returns `AuthError::BinAlreadyExists` or `AuthError::EmailAlreadyExists`
  /// when either identifier is taken
  pub async fn register(
    &self,
    bin: Bin,
    email: Email,
    password: Password,
  ) -> Result<(User, Session, SessionToken), AuthError> {
    if self.user_repo.find_by_bin(&bin).await?.is_some() {
      return Err(AuthError::BinAlreadyExists);
    }

    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    let is_staff = self.staff_bins.contains(bin.as_str());

    let user = User::new(
      bin.into_inner(),
      email.into_inner(),
      password_hash.into_inner(),
      is_staff,
    );

    let created_user = match self.user_repo.create(user).await {
      Ok(user) => user,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(constraint))) => {
        return Err(if constraint.contains("email") {
          AuthError::EmailAlreadyExists
        } else {
          AuthError::BinAlreadyExists
        });
      }
      Err(e) => return Err(e),
    };

    tracing::info!(
      user_id = %created_user.id,
      is_staff = created_user.is_staff,
      "User registered"
    );

    let (session, token) = self.open_session(&created_user, None, None).await?;

    Ok((created_user, session, token))
  }

  /// Authenticates a user by BIN and password and creates a new session
  pub async fn login(
    &self,
    bin: Bin,
    password: Password,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Result<(User, Session, SessionToken), AuthError> {
    let user = self
      .user_repo
      .find_by_bin(&bin)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    let password_hash = PasswordHash::from_hash(&user.password_hash)?;

    if !self.password_hasher.verify(&password, &password_hash).await? {
      tracing::debug!(user_id = %user.id, "Rejected login with wrong password");
      return Err(AuthError::InvalidCredentials);
    }

    let (session, token) = self.open_session(&user, ip_address, user_agent).await?;

    Ok((user, session, token))
  }

  /// Invalidates the session behind `token`
  pub async fn logout(&self, token: SessionToken) -> Result<(), AuthError> {
    let token_hash = token.hash();

    let session = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    self.session_repo.delete(&session).await
  }

  /// Validates a session token and returns the associated user
  pub async fn validate_session(&self, token: SessionToken) -> Result<User, AuthError> {
    let token_hash = token.hash();

    let session = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
      self.session_repo.delete(&session).await?;
      return Err(AuthError::InvalidSession);
    }

    self
      .user_repo
      .find_by_id(session.user_id)
      .await?
      .ok_or(AuthError::UserNotFound)
  }

  async fn open_session(
    &self,
    user: &User,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Result<(Session, SessionToken), AuthError> {
    let token = SessionToken::generate();

    let session = Session::with_duration(
      user.id,
      token.hash().into_inner(),
      Duration::seconds(self.config.session_ttl_seconds),
      ip_address,
      user_agent,
    );

    let created = self.session_repo.create(session).await?;
    Ok((created, token))
  }
}
