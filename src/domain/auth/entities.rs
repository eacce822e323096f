use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// User entity; accounts are identified by their company BIN
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  /// Business identification number (unique)
  pub bin_number: String,
  /// Contact email (unique)
  pub email: String,
  /// Argon2id hash
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub is_verified: bool,
  /// Staff users manage catalog data and 1C integrations
  pub is_staff: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn new(bin_number: String, email: String, password_hash: String, is_staff: bool) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      bin_number,
      email,
      password_hash,
      is_verified: false,
      is_staff,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Session entity representing an active user session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub id: Uuid,
  pub user_id: Uuid,
  /// SHA-256 hash of the bearer token, never the token itself
  pub session_token: String,
  pub ip_address: Option<IpAddr>,
  pub user_agent: Option<String>,
  pub expires_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Session {
  /// Creates a session that expires after `duration`
  pub fn with_duration(
    user_id: Uuid,
    session_token: String,
    duration: Duration,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      session_token,
      ip_address,
      user_agent,
      expires_at: now + duration,
      created_at: now,
    }
  }

  pub fn is_expired(&self) -> bool {
    self.expires_at <= Utc::now()
  }

  /// Seconds left before expiry, zero once expired
  pub fn remaining_seconds(&self) -> u64 {
    (self.expires_at - Utc::now()).num_seconds().max(0) as u64
  }
}
