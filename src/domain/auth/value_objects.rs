use argon2::{Argon2, PasswordHash as Argon2PasswordHash, PasswordVerifier};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::ValidateEmail;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Invalid BIN: {0}")]
  InvalidBin(String),

  #[error("Invalid email format: {0}")]
  InvalidEmail(String),

  #[error("Password is too short (minimum {0} characters)")]
  PasswordTooShort(usize),

  #[error("Password is too long (maximum 128 characters)")]
  PasswordTooLong,

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("Password verification failed: {0}")]
  VerificationFailed(String),

  #[error("Invalid token format")]
  InvalidToken,
}

// ============================================================================
// Bin Value Object (Kazakhstan business identification number)
// ============================================================================

/// Twelve digit business identification number with a mod-11 control digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bin(String);

impl Bin {
  const LENGTH: usize = 12;
  const PRIMARY_WEIGHTS: [u32; 11] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
  const SECONDARY_WEIGHTS: [u32; 11] = [3, 4, 5, 6, 7, 8, 9, 10, 11, 1, 2];

  /// Parses a BIN, ignoring spaces, dashes, underscores and dots between digits.
  pub fn new(value: impl AsRef<str>) -> Result<Self, ValueObjectError> {
    let raw = value.as_ref();
    let normalized: String = raw
      .trim()
      .chars()
      .filter(|c| !matches!(c, ' ' | '-' | '_' | '.'))
      .collect();

    if normalized.len() != Self::LENGTH || !normalized.chars().all(|c| c.is_ascii_digit()) {
      return Err(ValueObjectError::InvalidBin(format!(
        "'{}' must contain exactly 12 digits",
        raw
      )));
    }

    let digits: Vec<u32> = normalized
      .chars()
      .filter_map(|c| c.to_digit(10))
      .collect();

    match Self::control_digit(&digits[..11]) {
      Some(control) if control == digits[11] => Ok(Self(normalized)),
      Some(_) => Err(ValueObjectError::InvalidBin(format!(
        "'{}' has an invalid control digit",
        raw
      ))),
      None => Err(ValueObjectError::InvalidBin(format!(
        "'{}' cannot produce a valid control digit",
        raw
      ))),
    }
  }

  fn control_digit(digits: &[u32]) -> Option<u32> {
    let weighted = |weights: &[u32; 11]| -> u32 {
      digits
        .iter()
        .zip(weights.iter())
        .map(|(d, w)| d * w)
        .sum::<u32>()
        % 11
    };

    match weighted(&Self::PRIMARY_WEIGHTS) {
      10 => match weighted(&Self::SECONDARY_WEIGHTS) {
        10 => None,
        checksum => Some(checksum),
      },
      checksum => Some(checksum),
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Bin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl TryFrom<String> for Bin {
  type Error = ValueObjectError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<Bin> for String {
  fn from(bin: Bin) -> Self {
    bin.0
  }
}

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    let email = email.into();

    if !email.validate_email() {
      return Err(ValueObjectError::InvalidEmail(email));
    }

    Ok(Self(email.trim().to_lowercase()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

#[derive(Clone)]
pub struct Password(String);

impl Password {
  pub const DEFAULT_MIN_LENGTH: usize = 8;
  const MAX_LENGTH: usize = 128;

  /// Creates a new Password with the default minimum length
  pub fn new(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    Self::with_min_length(password, Self::DEFAULT_MIN_LENGTH)
  }

  /// Creates a new Password enforcing a configured minimum length
  pub fn with_min_length(
    password: impl Into<String>,
    min_length: usize,
  ) -> Result<Self, ValueObjectError> {
    let password = password.into();

    if password.chars().count() < min_length {
      return Err(ValueObjectError::PasswordTooShort(min_length));
    }

    if password.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong);
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object (Argon2id Hash)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Creates a new PasswordHash from an existing PHC hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    Argon2PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  /// Verifies a password against this hash
  pub fn verify(&self, password: &Password) -> Result<bool, ValueObjectError> {
    let parsed_hash = Argon2PasswordHash::new(&self.0)
      .map_err(|e| ValueObjectError::VerificationFailed(e.to_string()))?;

    Ok(
      Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed_hash)
        .is_ok(),
    )
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// SessionToken Value Object (Random Secure Token)
// ============================================================================

#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
  const TOKEN_LENGTH: usize = 32; // bytes

  /// Generates a new random session token
  pub fn generate() -> Self {
    use rand::Rng;

    let token: [u8; Self::TOKEN_LENGTH] = rand::rngs::OsRng.sample(rand::distributions::Standard);
    Self(hex::encode(token))
  }

  /// Creates a SessionToken from a client supplied string
  pub fn from_string(token: impl Into<String>) -> Result<Self, ValueObjectError> {
    let token = token.into();

    if token.len() != Self::TOKEN_LENGTH * 2 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(ValueObjectError::InvalidToken);
    }

    Ok(Self(token))
  }

  /// Creates a hash of this token for storage
  pub fn hash(&self) -> TokenHash {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(self.0.as_bytes());
    TokenHash(hex::encode(hasher.finalize()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SessionToken(***)")
  }
}

// ============================================================================
// TokenHash Value Object (SHA-256 Hash of Token)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHash(String);

impl TokenHash {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bin_primary_checksum() {
    let bin = Bin::new("940140000385").unwrap();
    assert_eq!(bin.as_str(), "940140000385");
  }

  #[test]
  fn test_bin_secondary_checksum() {
    // Primary weights give 10, the alternate weights give 9
    assert!(Bin::new("100340000179").is_ok());
  }

  #[test]
  fn test_bin_wrong_control_digit() {
    assert!(matches!(
      Bin::new("940140000386"),
      Err(ValueObjectError::InvalidBin(_))
    ));
  }

  #[test]
  fn test_bin_format() {
    assert!(Bin::new("").is_err());
    assert!(Bin::new("94014000038").is_err());
    assert!(Bin::new("9401400003851").is_err());
    assert!(Bin::new("94014000038a").is_err());
  }

  #[test]
  fn test_bin_strips_separators() {
    let bin = Bin::new(" 9401-4000.0385 ").unwrap();
    assert_eq!(bin.to_string(), "940140000385");
  }

  #[test]
  fn test_bin_serde() {
    let bin: Bin = serde_json::from_str("\"940140000385\"").unwrap();
    assert_eq!(serde_json::to_string(&bin).unwrap(), "\"940140000385\"");
    assert!(serde_json::from_str::<Bin>("\"940140000386\"").is_err());
  }

  #[test]
  fn test_email_normalized() {
    let email = Email::new("Buyer@Example.KZ").unwrap();
    assert_eq!(email.as_str(), "buyer@example.kz");
    assert!(Email::new("not-an-email").is_err());
  }

  #[test]
  fn test_password_length() {
    assert!(Password::new("short").is_err());
    assert!(Password::new("long enough").is_ok());
    assert!(Password::with_min_length("long enough", 12).is_err());
    assert!(Password::new("x".repeat(129)).is_err());
  }

  #[test]
  fn test_session_token_roundtrip() {
    let token = SessionToken::generate();
    assert_eq!(token.as_str().len(), 64);

    let parsed = SessionToken::from_string(token.as_str()).unwrap();
    assert_eq!(parsed.hash(), token.hash());
    assert!(SessionToken::from_string("abc").is_err());
  }

  #[test]
  fn test_session_token_debug_is_masked() {
    let token = SessionToken::generate();
    assert_eq!(format!("{:?}", token), "SessionToken(***)");
  }
}
