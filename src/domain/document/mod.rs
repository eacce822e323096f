pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{BusinessDocument, DocumentFilter, DocumentItem, NewDocument};
pub use errors::DocumentError;
pub use ports::{DocumentRepository, DocumentSequenceRepository};
pub use services::{CreateDocumentData, DocumentService, DocumentSettings};
pub use value_objects::{
  DocumentNumber, DocumentStatus, DocumentType, NumberPrefixes, ValueObjectError, VatBreakdown,
  VatRate, calculate_vat,
};
