pub mod argon2_hasher;
pub mod credential_encryption;

pub use argon2_hasher::Argon2PasswordHasher;
pub use credential_encryption::AesCredentialEncryption;
