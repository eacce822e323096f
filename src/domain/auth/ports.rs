use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Session, User};
use super::errors::AuthError;
use super::value_objects::{Bin, Email, Password, PasswordHash};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user; duplicate BIN or email surfaces as `DuplicateKey`
  async fn create(&self, user: User) -> Result<User, AuthError>;

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  async fn find_by_bin(&self, bin: &Bin) -> Result<Option<User>, AuthError>;

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;
}

/// Repository trait for session persistence operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
  async fn create(&self, session: Session) -> Result<Session, AuthError>;

  /// Finds a session by the SHA-256 hash of its token
  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError>;

  async fn delete(&self, session: &Session) -> Result<(), AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}
