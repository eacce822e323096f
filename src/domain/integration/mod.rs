pub mod dispatcher;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use dispatcher::{BulkExportResult, ExportOutcome, ImportSummary, SyncDispatcher, SyncSettings};
pub use entities::{
  Confirmation, ConfirmationBatch, ConfirmationFile, DeliveryReceipt, ExportPayload, Integration,
  IntegrationSettings, ItemPayload, PartyPayload, SyncLog,
};
pub use errors::{CredentialError, IntegrationError, TransportError};
pub use ports::{
  ConfirmationSource, CredentialCipher, DocumentTransport, IntegrationRepository, SyncLogRepository,
  TransportProvider,
};
pub use services::{IntegrationDefaults, IntegrationInput, IntegrationService};
pub use value_objects::{
  ConfirmationStatus, FileFormat, IntegrationType, SyncStatus, SyncType, ValueObjectError,
};
