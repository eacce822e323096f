use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::{AuthError, HashError, Password, PasswordHash};

/// Argon2id password hasher
///
/// Hashing and verification run on the blocking pool so that request
/// workers are not stalled by the memory-hard computation.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  params: Params,
}

impl Argon2PasswordHasher {
  /// 19 MiB memory, 2 iterations, 1 lane
  pub fn new() -> Result<Self, AuthError> {
    Self::with_params(19_456, 2, 1)
  }

  pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
    let params = Params::new(memory_kib, iterations, parallelism, Some(32)).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Invalid Argon2 parameters: {}",
        e
      )))
    })?;

    Ok(Self { params })
  }

  fn argon2(&self) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let argon2 = self.argon2();
    let plain = password.as_str().to_owned();

    let encoded = tokio::task::spawn_blocking(move || {
      let salt = SaltString::generate(&mut rand::rngs::OsRng);
      argon2
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError::HashingFailed(e.to_string()))
    })
    .await
    .map_err(|e| HashError::HashingFailed(e.to_string()))??;

    Ok(PasswordHash::from_hash(encoded)?)
  }

  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let argon2 = self.argon2();
    let plain = password.as_str().to_owned();
    let stored = hashed_password.as_str().to_owned();

    let verified = tokio::task::spawn_blocking(move || {
      let parsed = Argon2PasswordHash::new(&stored)
        .map_err(|e| HashError::VerificationFailed(format!("Invalid hash format: {}", e)))?;

      match argon2.verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashError::VerificationFailed(e.to_string())),
      }
    })
    .await
    .map_err(|e| HashError::VerificationFailed(e.to_string()))??;

    Ok(verified)
  }
}
