use aes_gcm::{
  Aes256Gcm, Nonce,
  aead::{Aead, KeyInit},
};
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;

use crate::domain::integration::{CredentialCipher, CredentialError};

const NONCE_LENGTH: usize = 12;

/// AES-256-GCM encryption for 1C credentials
///
/// Output is base64 of a random 96-bit nonce followed by the ciphertext.
pub struct AesCredentialEncryption {
  cipher: Aes256Gcm,
}

impl AesCredentialEncryption {
  /// `key_base64` must decode to exactly 32 bytes (`openssl rand -base64 32`)
  pub fn new(key_base64: &str) -> Result<Self, CredentialError> {
    let key_bytes = general_purpose::STANDARD
      .decode(key_base64.trim())
      .map_err(|e| CredentialError::EncryptionFailed(format!("Key decode failed: {}", e)))?;

    let key_array: &[u8; 32] = key_bytes.as_slice().try_into().map_err(|_| {
      CredentialError::EncryptionFailed(
        "Encryption key must be exactly 32 bytes (256 bits)".to_string(),
      )
    })?;

    Ok(Self {
      cipher: Aes256Gcm::new(key_array.into()),
    })
  }
}

impl CredentialCipher for AesCredentialEncryption {
  fn encrypt(&self, plaintext: &str) -> Result<String, CredentialError> {
    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = self
      .cipher
      .encrypt(nonce, plaintext.as_bytes())
      .map_err(|e| CredentialError::EncryptionFailed(e.to_string()))?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend_from_slice(&ciphertext);
    Ok(general_purpose::STANDARD.encode(combined))
  }

  fn decrypt(&self, encoded: &str) -> Result<String, CredentialError> {
    let combined = general_purpose::STANDARD
      .decode(encoded)
      .map_err(|e| CredentialError::DecryptionFailed(format!("Base64 decode failed: {}", e)))?;

    if combined.len() < NONCE_LENGTH {
      return Err(CredentialError::DecryptionFailed(
        "Invalid ciphertext format: too short".to_string(),
      ));
    }

    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LENGTH);
    let plaintext = self
      .cipher
      .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
      .map_err(|e| CredentialError::DecryptionFailed(e.to_string()))?;

    String::from_utf8(plaintext)
      .map_err(|e| CredentialError::DecryptionFailed(format!("UTF-8 conversion failed: {}", e)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn encryption() -> AesCredentialEncryption {
    AesCredentialEncryption::new(&general_purpose::STANDARD.encode([42u8; 32])).unwrap()
  }

  #[test]
  fn test_password_round_trips_with_fresh_nonce() {
    let encryption = encryption();

    let first = encryption.encrypt("exchange-p@ss").unwrap();
    let second = encryption.encrypt("exchange-p@ss").unwrap();

    assert_ne!(first, "exchange-p@ss");
    assert_ne!(first, second);
    assert_eq!(encryption.decrypt(&first).unwrap(), "exchange-p@ss");
    assert_eq!(encryption.decrypt(&second).unwrap(), "exchange-p@ss");
  }

  #[test]
  fn test_key_must_be_32_bytes() {
    let short_key = general_purpose::STANDARD.encode([42u8; 16]);
    assert!(AesCredentialEncryption::new(&short_key).is_err());
    assert!(AesCredentialEncryption::new("not base64!!").is_err());
  }

  #[test]
  fn test_tampered_or_foreign_ciphertext_is_rejected() {
    let encryption = encryption();
    let encrypted = encryption.encrypt("s3cret").unwrap();

    let mut tampered = general_purpose::STANDARD.decode(&encrypted).unwrap();
    tampered[NONCE_LENGTH + 1] ^= 0xFF;
    assert!(matches!(
      encryption.decrypt(&general_purpose::STANDARD.encode(tampered)),
      Err(CredentialError::DecryptionFailed(_))
    ));

    let other_key =
      AesCredentialEncryption::new(&general_purpose::STANDARD.encode([7u8; 32])).unwrap();
    assert!(other_key.decrypt(&encrypted).is_err());
    assert!(encryption.decrypt("s3cret").is_err());
  }
}
