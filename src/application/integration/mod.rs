//! 1C integration use cases

pub mod bulk_export;
pub mod export_document;
pub mod import_confirmations;
pub mod list_sync_logs;
pub mod manage_integrations;

pub use bulk_export::{BulkExportCommand, BulkExportResponse, BulkExportUseCase};
pub use export_document::{ExportDocumentCommand, ExportDocumentResponse, ExportDocumentUseCase};
pub use import_confirmations::ImportConfirmationsUseCase;
pub use list_sync_logs::{ListSyncLogsCommand, ListSyncLogsUseCase, SyncLogDto};
pub use manage_integrations::{
  CreateIntegrationUseCase, DeleteIntegrationUseCase, GetIntegrationUseCase, IntegrationCommand,
  IntegrationDto, ListIntegrationsUseCase, UpdateIntegrationUseCase,
};
