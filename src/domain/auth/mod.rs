pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Session, User};
pub use errors::{AuthError, HashError, RepositoryError};
pub use services::{AuthService, AuthServiceConfig};
pub use value_objects::{
  Bin, Email, Password, PasswordHash, SessionToken, TokenHash, ValueObjectError,
};
