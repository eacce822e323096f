pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Company, Item, ItemFilter};
pub use errors::CatalogError;
pub use ports::{CompanyRepository, ItemRepository};
pub use services::CatalogService;
pub use value_objects::{Money, Quantity, ValueObjectError};
