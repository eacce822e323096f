use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::entities::{Confirmation, DeliveryReceipt, ExportPayload, Integration, SyncLog};
use super::errors::IntegrationError;
use super::ports::{ConfirmationSource, IntegrationRepository, SyncLogRepository, TransportProvider};
use super::value_objects::{ConfirmationStatus, SyncStatus, SyncType};
use crate::domain::auth::Bin;
use crate::domain::catalog::{CatalogError, Company, CompanyRepository};
use crate::domain::document::{BusinessDocument, DocumentError, DocumentRepository, DocumentStatus};

#[derive(Debug, Clone)]
pub struct SyncSettings {
  pub batch_size: usize,
  pub max_log_entries: i64,
}

impl Default for SyncSettings {
  fn default() -> Self {
    Self {
      batch_size: 100,
      max_log_entries: 1000,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
  pub document: BusinessDocument,
  pub receipt: DeliveryReceipt,
  pub log: SyncLog,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkExportResult {
  pub document_id: Uuid,
  pub document_number: Option<String>,
  pub success: bool,
  pub status: SyncStatus,
  pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
  pub files_processed: usize,
  pub confirmed: usize,
  pub rejected: usize,
  /// Confirmations that matched no document or could not be applied
  pub skipped: Vec<String>,
  pub unreadable: Vec<String>,
}

/// Picks a transport for each document, delivers it and records the attempt
pub struct SyncDispatcher {
  integration_repo: Arc<dyn IntegrationRepository>,
  sync_log_repo: Arc<dyn SyncLogRepository>,
  document_repo: Arc<dyn DocumentRepository>,
  company_repo: Arc<dyn CompanyRepository>,
  transports: Arc<dyn TransportProvider>,
  confirmations: Arc<dyn ConfirmationSource>,
  settings: SyncSettings,
}

impl SyncDispatcher {
  pub fn new(
    integration_repo: Arc<dyn IntegrationRepository>,
    sync_log_repo: Arc<dyn SyncLogRepository>,
    document_repo: Arc<dyn DocumentRepository>,
    company_repo: Arc<dyn CompanyRepository>,
    transports: Arc<dyn TransportProvider>,
    confirmations: Arc<dyn ConfirmationSource>,
    settings: SyncSettings,
  ) -> Self {
    Self {
      integration_repo,
      sync_log_repo,
      document_repo,
      company_repo,
      transports,
      confirmations,
      settings,
    }
  }

  /// Delivers one document; the attempt is logged whatever the outcome
  pub async fn export_document(
    &self,
    user_id: Uuid,
    document_id: Uuid,
    integration_id: Option<Uuid>,
  ) -> Result<ExportOutcome, IntegrationError> {
    let document = self.owned_document(user_id, document_id).await?;
    let integration = self.resolve_integration(integration_id).await?;
    self.deliver(document, &integration).await
  }

  /// Exports each document independently and reports per-document results
  pub async fn bulk_export(
    &self,
    user_id: Uuid,
    document_ids: &[Uuid],
    integration_id: Option<Uuid>,
  ) -> Result<Vec<BulkExportResult>, IntegrationError> {
    if document_ids.is_empty() {
      return Err(IntegrationError::EmptyBatch);
    }
    if document_ids.len() > self.settings.batch_size {
      return Err(IntegrationError::BatchTooLarge {
        max: self.settings.batch_size,
        actual: document_ids.len(),
      });
    }

    let integration = self.resolve_integration(integration_id).await?;
    let mut results = Vec::with_capacity(document_ids.len());

    for &document_id in document_ids {
      let outcome = match self.owned_document(user_id, document_id).await {
        Ok(document) => self.deliver(document, &integration).await,
        Err(e) => Err(e),
      };

      results.push(match outcome {
        Ok(outcome) => BulkExportResult {
          document_id,
          document_number: Some(outcome.document.document_number.into_inner()),
          success: true,
          status: outcome.receipt.status,
          message: outcome.receipt.message,
        },
        Err(e) => BulkExportResult {
          document_id,
          document_number: None,
          success: false,
          status: SyncStatus::Failed,
          message: e.to_string(),
        },
      });
    }

    let succeeded = results.iter().filter(|r| r.success).count();
    tracing::info!(
      integration_id = %integration.id,
      total = results.len(),
      succeeded,
      "Bulk export finished"
    );

    Ok(results)
  }

  /// Applies confirmation files left by 1C in the integration's import directory
  pub async fn import_confirmations(
    &self,
    integration_id: Uuid,
  ) -> Result<ImportSummary, IntegrationError> {
    let integration = self
      .integration_repo
      .find_by_id(integration_id)
      .await?
      .ok_or(IntegrationError::IntegrationNotFound(integration_id))?;

    if !integration.integration_type.reads_files() {
      return Err(IntegrationError::ImportNotSupported(
        integration.integration_type,
      ));
    }
    if !integration.is_active {
      return Err(IntegrationError::IntegrationInactive(integration.id));
    }

    let batch = self.confirmations.pending(&integration).await?;
    let mut summary = ImportSummary {
      unreadable: batch
        .unreadable
        .into_iter()
        .map(|(source, reason)| format!("{}: {}", source, reason))
        .collect(),
      ..ImportSummary::default()
    };

    for file in batch.files {
      for confirmation in &file.confirmations {
        let reason = match self.apply_confirmation(&integration, confirmation).await {
          Ok(Ok(ConfirmationStatus::Confirmed)) => {
            summary.confirmed += 1;
            continue;
          }
          Ok(Ok(ConfirmationStatus::Rejected)) => {
            summary.rejected += 1;
            continue;
          }
          Ok(Err(reason)) => reason,
          // Reported per line; the file is still marked processed
          Err(e) => {
            tracing::warn!(
              integration_id = %integration.id,
              source = %file.source,
              document_number = %confirmation.document_number,
              error = %e,
              "Confirmation could not be applied"
            );
            e.to_string()
          }
        };
        summary.skipped.push(format!(
          "{} ({}): {}",
          confirmation.document_number, file.source, reason
        ));
      }

      self
        .confirmations
        .mark_processed(&integration, &file.source)
        .await?;
      summary.files_processed += 1;
    }

    if summary.files_processed > 0 {
      self
        .integration_repo
        .touch_last_sync(integration.id, Utc::now())
        .await?;
    }

    tracing::info!(
      integration_id = %integration.id,
      files = summary.files_processed,
      confirmed = summary.confirmed,
      rejected = summary.rejected,
      skipped = summary.skipped.len(),
      unreadable = summary.unreadable.len(),
      "Confirmations imported"
    );

    Ok(summary)
  }

  /// Sync history of the user's documents, newest first
  pub async fn list_sync_logs(
    &self,
    user_id: Uuid,
    document_id: Option<Uuid>,
  ) -> Result<Vec<SyncLog>, IntegrationError> {
    if let Some(document_id) = document_id {
      self.owned_document(user_id, document_id).await?;
    }

    self
      .sync_log_repo
      .list_for_owner(user_id, document_id, self.settings.max_log_entries)
      .await
  }

  async fn deliver(
    &self,
    mut document: BusinessDocument,
    integration: &Integration,
  ) -> Result<ExportOutcome, IntegrationError> {
    if document.status == DocumentStatus::Cancelled {
      return Err(IntegrationError::NotExportable(format!(
        "document {} is cancelled",
        document.document_number
      )));
    }

    let sync_type = if document.status == DocumentStatus::Draft {
      SyncType::Export
    } else {
      SyncType::Update
    };

    let items = self.document_repo.find_items(document.id).await?;
    let seller = self.company(document.seller_company_id).await?;
    let buyer = self.company(document.buyer_company_id).await?;
    let payload = ExportPayload::build(&document, &items, &seller, &buyer);

    let started = Instant::now();
    let result = match self.transports.transport_for(integration) {
      Ok(transport) => transport.deliver(&payload).await,
      Err(e) => Err(e),
    };
    let duration_ms = started.elapsed().as_millis() as i64;

    let receipt = match result {
      Ok(receipt) => receipt,
      Err(e) => {
        tracing::warn!(
          document_id = %document.id,
          integration_id = %integration.id,
          error = %e,
          "Document export failed"
        );
        self
          .sync_log_repo
          .append(
            SyncLog::record(
              document.id,
              integration.id,
              sync_type,
              SyncStatus::Failed,
              e.to_string(),
            )
            .with_duration(duration_ms),
          )
          .await?;
        return Err(e.into());
      }
    };

    let log = self
      .sync_log_repo
      .append(
        SyncLog::record(
          document.id,
          integration.id,
          sync_type,
          receipt.status,
          receipt.message.clone(),
        )
        .with_response(receipt.response_data.clone())
        .with_duration(duration_ms),
      )
      .await?;

    if receipt.status.is_accepted() {
      let mut changed = document.transition_to(DocumentStatus::Sent);
      if let Some(external_id) = &receipt.external_id {
        document.external_id = Some(external_id.clone());
        document.updated_at = Utc::now();
        changed = true;
      }
      if changed {
        self.document_repo.update(&document).await?;
      }
      self
        .integration_repo
        .touch_last_sync(integration.id, Utc::now())
        .await?;
    }

    tracing::info!(
      document_id = %document.id,
      number = %document.document_number,
      status = %receipt.status,
      duration_ms,
      "Document exported"
    );

    Ok(ExportOutcome {
      document,
      receipt,
      log,
    })
  }

  /// Returns `Ok(Err(reason))` when the confirmation cannot be matched or applied
  async fn apply_confirmation(
    &self,
    integration: &Integration,
    confirmation: &Confirmation,
  ) -> Result<Result<ConfirmationStatus, String>, IntegrationError> {
    let seller_id = match confirmation
      .seller_bin
      .as_deref()
      .map(str::trim)
      .filter(|bin| !bin.is_empty())
    {
      Some(raw) => {
        let Ok(bin) = Bin::new(raw) else {
          return Ok(Err(format!("invalid seller BIN {}", raw)));
        };
        match self.company_repo.find_by_bin(&bin).await? {
          Some(company) => Some(company.id),
          None => return Ok(Err(format!("unknown seller BIN {}", bin))),
        }
      }
      None => None,
    };

    let mut matches = self
      .document_repo
      .find_by_number(seller_id, confirmation.document_number.trim())
      .await?;
    let mut document = match matches.len() {
      0 => return Ok(Err("no document with this number".to_string())),
      1 => matches.remove(0),
      _ => return Ok(Err("number is ambiguous, seller BIN required".to_string())),
    };

    let message = confirmation
      .message
      .clone()
      .filter(|m| !m.trim().is_empty());

    let (status, text) = match confirmation.status {
      ConfirmationStatus::Rejected => (
        SyncStatus::Failed,
        message.unwrap_or_else(|| "Rejected by 1C".to_string()),
      ),
      ConfirmationStatus::Confirmed => {
        let already = matches!(
          document.status,
          DocumentStatus::Confirmed | DocumentStatus::Paid
        );
        if !already && !document.transition_to(DocumentStatus::Confirmed) {
          let reason = format!("cannot confirm a document in status {}", document.status);
          self
            .sync_log_repo
            .append(SyncLog::record(
              document.id,
              integration.id,
              SyncType::Import,
              SyncStatus::Failed,
              reason.clone(),
            ))
            .await?;
          return Ok(Err(reason));
        }
        if let Some(external_id) = confirmation.external_id.clone() {
          document.external_id = Some(external_id);
        }
        self.document_repo.update(&document).await?;
        (
          SyncStatus::Success,
          message.unwrap_or_else(|| "Confirmed by 1C".to_string()),
        )
      }
    };

    self
      .sync_log_repo
      .append(
        SyncLog::record(document.id, integration.id, SyncType::Import, status, text)
          .with_response(serde_json::to_value(confirmation).ok()),
      )
      .await?;

    Ok(Ok(confirmation.status))
  }

  async fn resolve_integration(
    &self,
    integration_id: Option<Uuid>,
  ) -> Result<Integration, IntegrationError> {
    match integration_id {
      Some(id) => {
        let integration = self
          .integration_repo
          .find_by_id(id)
          .await?
          .ok_or(IntegrationError::IntegrationNotFound(id))?;
        if !integration.is_active {
          return Err(IntegrationError::IntegrationInactive(id));
        }
        Ok(integration)
      }
      None => self
        .integration_repo
        .find_first_active()
        .await?
        .ok_or(IntegrationError::NoActiveIntegration),
    }
  }

  async fn owned_document(
    &self,
    user_id: Uuid,
    document_id: Uuid,
  ) -> Result<BusinessDocument, IntegrationError> {
    let document = self
      .document_repo
      .find_by_id(document_id)
      .await?
      .filter(|document| document.is_owned_by(user_id))
      .ok_or(DocumentError::DocumentNotFound(document_id))?;
    Ok(document)
  }

  async fn company(&self, company_id: Uuid) -> Result<Company, IntegrationError> {
    let company = self
      .company_repo
      .find_by_id(company_id)
      .await?
      .ok_or(CatalogError::CompanyNotFound(company_id))?;
    Ok(company)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::catalog::{Money, Quantity};
  use crate::domain::commerce::OrderItem;
  use crate::domain::document::{DocumentNumber, DocumentType, NewDocument, VatRate};
  use crate::domain::integration::entities::{ConfirmationBatch, ConfirmationFile, IntegrationSettings};
  use crate::domain::integration::value_objects::{FileFormat, IntegrationType};
  use crate::test_support::{
    InMemoryCatalog, InMemoryDocuments, InMemoryIntegrations, InMemorySyncLogs, StubConfirmations,
    StubTransports,
  };
  use chrono::NaiveDate;
  use rust_decimal_macros::dec;

  struct Fixture {
    dispatcher: SyncDispatcher,
    documents: InMemoryDocuments,
    integrations: InMemoryIntegrations,
    logs: InMemorySyncLogs,
    transports: StubTransports,
    confirmations: StubConfirmations,
    catalog: InMemoryCatalog,
    seller: Company,
    buyer: Company,
    owner: Uuid,
  }

  fn integration(integration_type: IntegrationType, is_active: bool) -> Integration {
    Integration::new(IntegrationSettings {
      name: format!("{} 1C", integration_type),
      integration_type,
      endpoint_url: Some("https://1c.example.kz/hs/documents".into()),
      username: "exchange".into(),
      password_encrypted: None,
      export_path: "exports".into(),
      import_path: "imports".into(),
      file_format: FileFormat::Json,
      auto_sync: false,
      sync_interval_minutes: 60,
      is_active,
    })
  }

  fn fixture_with(transports: StubTransports, confirmations: StubConfirmations) -> Fixture {
    let catalog = InMemoryCatalog::default();
    let seller = catalog.seed_company("Tech Shop", Some("940140000385"));
    let buyer = catalog.seed_company("Buyer LLP", Some("100340000179"));

    let documents = InMemoryDocuments::default();
    let integrations = InMemoryIntegrations::default();
    let logs = InMemorySyncLogs::new(documents.clone());

    let dispatcher = SyncDispatcher::new(
      Arc::new(integrations.clone()),
      Arc::new(logs.clone()),
      Arc::new(documents.clone()),
      Arc::new(catalog.clone()),
      Arc::new(transports.clone()),
      Arc::new(confirmations.clone()),
      SyncSettings {
        batch_size: 3,
        max_log_entries: 1000,
      },
    );

    Fixture {
      dispatcher,
      documents,
      integrations,
      logs,
      transports,
      confirmations,
      catalog,
      seller,
      buyer,
      owner: Uuid::new_v4(),
    }
  }

  fn fixture(transports: StubTransports) -> Fixture {
    fixture_with(transports, StubConfirmations::default())
  }

  async fn seed_document(f: &Fixture, sequence: i64, status: DocumentStatus) -> BusinessDocument {
    let date = NaiveDate::from_ymd_opt(2024, 12, 3).unwrap();
    let item = f.catalog.seed_item(f.seller.id, "Router", dec!(30000));
    let order_items = vec![OrderItem {
      id: Uuid::new_v4(),
      order_id: Uuid::new_v4(),
      item_id: item.id,
      company_id: f.seller.id,
      title: item.title.clone(),
      quantity: Quantity::new(2).unwrap(),
      unit_price: Money::new(dec!(30000)).unwrap(),
      line_order: 0,
    }];

    let (mut document, items) = BusinessDocument::draft(
      NewDocument {
        owner_id: f.owner,
        document_type: DocumentType::Invoice,
        order_id: order_items[0].order_id,
        seller_company_id: f.seller.id,
        buyer_company_id: f.buyer.id,
        document_number: DocumentNumber::format("INV", date, sequence),
        document_date: date,
        due_date: None,
        vat_rate: VatRate::new(dec!(12)).unwrap(),
        notes: String::new(),
      },
      &order_items,
    );
    document.status = status;
    f.documents.create(document, items).await.unwrap()
  }

  #[tokio::test]
  async fn test_webservice_success_marks_document_sent() {
    let f = fixture(StubTransports::delivering(SyncStatus::Success, Some("1C-778")));
    let hub = f.integrations.seed(integration(IntegrationType::Webservice, true));
    let document = seed_document(&f, 1, DocumentStatus::Draft).await;

    let outcome = f
      .dispatcher
      .export_document(f.owner, document.id, None)
      .await
      .unwrap();

    assert_eq!(outcome.receipt.status, SyncStatus::Success);
    assert_eq!(outcome.log.sync_type, SyncType::Export);

    let stored = f.documents.get(document.id).unwrap();
    assert_eq!(stored.status, DocumentStatus::Sent);
    assert_eq!(stored.external_id.as_deref(), Some("1C-778"));
    assert!(f.integrations.get(hub.id).unwrap().last_sync.is_some());

    let logs = f.logs.entries();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, SyncStatus::Success);
    assert_eq!(f.transports.delivered(), vec!["INV-2024-12-0001"]);
  }

  #[tokio::test]
  async fn test_pending_file_export_marks_document_sent() {
    let f = fixture(StubTransports::delivering(SyncStatus::Pending, None));
    f.integrations.seed(integration(IntegrationType::FileExport, true));
    let document = seed_document(&f, 1, DocumentStatus::Draft).await;

    f.dispatcher
      .export_document(f.owner, document.id, None)
      .await
      .unwrap();

    let stored = f.documents.get(document.id).unwrap();
    assert_eq!(stored.status, DocumentStatus::Sent);
    assert!(stored.external_id.is_none());
    assert_eq!(f.logs.entries()[0].status, SyncStatus::Pending);
  }

  #[tokio::test]
  async fn test_failure_is_logged_and_propagated() {
    let f = fixture(StubTransports::failing(500));
    let hub = f.integrations.seed(integration(IntegrationType::Webservice, true));
    let document = seed_document(&f, 1, DocumentStatus::Draft).await;

    let result = f
      .dispatcher
      .export_document(f.owner, document.id, Some(hub.id))
      .await;
    assert!(matches!(result, Err(IntegrationError::Transport(_))));

    let logs = f.logs.entries();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, SyncStatus::Failed);
    assert!(logs[0].message.contains("500"));

    assert_eq!(
      f.documents.get(document.id).unwrap().status,
      DocumentStatus::Draft
    );
    assert!(f.integrations.get(hub.id).unwrap().last_sync.is_none());
  }

  #[tokio::test]
  async fn test_re_export_is_an_update() {
    let f = fixture(StubTransports::delivering(SyncStatus::Success, None));
    f.integrations.seed(integration(IntegrationType::Webservice, true));
    let document = seed_document(&f, 1, DocumentStatus::Confirmed).await;

    let outcome = f
      .dispatcher
      .export_document(f.owner, document.id, None)
      .await
      .unwrap();

    assert_eq!(outcome.log.sync_type, SyncType::Update);
    assert_eq!(outcome.document.status, DocumentStatus::Confirmed);
  }

  #[tokio::test]
  async fn test_cancelled_and_unowned_documents_are_not_exported() {
    let f = fixture(StubTransports::delivering(SyncStatus::Success, None));
    f.integrations.seed(integration(IntegrationType::Webservice, true));
    let cancelled = seed_document(&f, 1, DocumentStatus::Cancelled).await;

    assert!(matches!(
      f.dispatcher.export_document(f.owner, cancelled.id, None).await,
      Err(IntegrationError::NotExportable(_))
    ));
    assert!(matches!(
      f.dispatcher
        .export_document(Uuid::new_v4(), cancelled.id, None)
        .await,
      Err(IntegrationError::Document(DocumentError::DocumentNotFound(_)))
    ));
    assert!(f.logs.entries().is_empty());
  }

  #[tokio::test]
  async fn test_integration_resolution() {
    let f = fixture(StubTransports::delivering(SyncStatus::Success, None));
    let document = seed_document(&f, 1, DocumentStatus::Draft).await;

    assert!(matches!(
      f.dispatcher.export_document(f.owner, document.id, None).await,
      Err(IntegrationError::NoActiveIntegration)
    ));

    let inactive = f.integrations.seed(integration(IntegrationType::Webservice, false));
    assert!(matches!(
      f.dispatcher
        .export_document(f.owner, document.id, Some(inactive.id))
        .await,
      Err(IntegrationError::IntegrationInactive(_))
    ));
    assert!(matches!(
      f.dispatcher
        .export_document(f.owner, document.id, Some(Uuid::new_v4()))
        .await,
      Err(IntegrationError::IntegrationNotFound(_))
    ));
  }

  #[tokio::test]
  async fn test_bulk_export_reports_each_document() {
    let f = fixture(StubTransports::delivering(SyncStatus::Success, None));
    f.integrations.seed(integration(IntegrationType::Webservice, true));
    let first = seed_document(&f, 1, DocumentStatus::Draft).await;
    let second = seed_document(&f, 2, DocumentStatus::Sent).await;
    let missing = Uuid::new_v4();

    let results = f
      .dispatcher
      .bulk_export(f.owner, &[first.id, missing, second.id], None)
      .await
      .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(results[1].status, SyncStatus::Failed);
    assert_eq!(
      results[2].document_number.as_deref(),
      Some("INV-2024-12-0002")
    );
    assert_eq!(f.logs.entries().len(), 2);
  }

  #[tokio::test]
  async fn test_bulk_export_limits() {
    let f = fixture(StubTransports::delivering(SyncStatus::Success, None));
    f.integrations.seed(integration(IntegrationType::Webservice, true));

    assert!(matches!(
      f.dispatcher.bulk_export(f.owner, &[], None).await,
      Err(IntegrationError::EmptyBatch)
    ));

    let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    assert!(matches!(
      f.dispatcher.bulk_export(f.owner, &ids, None).await,
      Err(IntegrationError::BatchTooLarge { max: 3, actual: 4 })
    ));
  }

  #[tokio::test]
  async fn test_import_confirmations() {
    let batch = ConfirmationBatch {
      files: vec![ConfirmationFile {
        source: "confirmations_1.json".into(),
        confirmations: vec![
          Confirmation {
            document_number: "INV-2024-12-0001".into(),
            seller_bin: Some("940140000385".into()),
            status: ConfirmationStatus::Confirmed,
            external_id: Some("1C-0001".into()),
            message: None,
          },
          Confirmation {
            document_number: "INV-2024-12-0002".into(),
            seller_bin: None,
            status: ConfirmationStatus::Rejected,
            external_id: None,
            message: Some("Buyer BIN mismatch".into()),
          },
          Confirmation {
            document_number: "INV-2024-12-0099".into(),
            seller_bin: None,
            status: ConfirmationStatus::Confirmed,
            external_id: None,
            message: None,
          },
        ],
      }],
      unreadable: vec![("broken.xml".into(), "unexpected end of file".into())],
    };
    let f = fixture_with(
      StubTransports::delivering(SyncStatus::Success, None),
      StubConfirmations::with_batch(batch),
    );
    let hub = f.integrations.seed(integration(IntegrationType::Hybrid, true));
    let sent = seed_document(&f, 1, DocumentStatus::Sent).await;
    let rejected = seed_document(&f, 2, DocumentStatus::Sent).await;

    let summary = f.dispatcher.import_confirmations(hub.id).await.unwrap();

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.confirmed, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.unreadable.len(), 1);
    assert_eq!(f.confirmations.processed(), vec!["confirmations_1.json"]);

    let confirmed = f.documents.get(sent.id).unwrap();
    assert_eq!(confirmed.status, DocumentStatus::Confirmed);
    assert_eq!(confirmed.external_id.as_deref(), Some("1C-0001"));
    assert_eq!(
      f.documents.get(rejected.id).unwrap().status,
      DocumentStatus::Sent
    );

    let logs = f.logs.entries();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|log| log.sync_type == SyncType::Import));
    assert_eq!(logs[1].status, SyncStatus::Failed);
    assert_eq!(logs[1].message, "Buyer BIN mismatch");
  }

  #[tokio::test]
  async fn test_import_keeps_going_when_a_document_cannot_be_saved() {
    let confirm = |number: &str| Confirmation {
      document_number: number.into(),
      seller_bin: None,
      status: ConfirmationStatus::Confirmed,
      external_id: None,
      message: None,
    };
    let batch = ConfirmationBatch {
      files: vec![ConfirmationFile {
        source: "confirmations_2.json".into(),
        confirmations: vec![
          confirm("INV-2024-12-0001"),
          confirm("INV-2024-12-0002"),
          confirm("INV-2024-12-0003"),
        ],
      }],
      unreadable: vec![],
    };
    let f = fixture_with(
      StubTransports::delivering(SyncStatus::Success, None),
      StubConfirmations::with_batch(batch),
    );
    let hub = f.integrations.seed(integration(IntegrationType::FileExport, true));
    let first = seed_document(&f, 1, DocumentStatus::Sent).await;
    let broken = seed_document(&f, 2, DocumentStatus::Sent).await;
    let last = seed_document(&f, 3, DocumentStatus::Sent).await;
    f.documents.fail_updates_of(broken.id);

    let summary = f.dispatcher.import_confirmations(hub.id).await.unwrap();

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.confirmed, 2);
    assert_eq!(summary.skipped.len(), 1);
    assert!(summary.skipped[0].starts_with("INV-2024-12-0002 (confirmations_2.json)"));
    assert_eq!(f.confirmations.processed(), vec!["confirmations_2.json"]);

    assert_eq!(f.documents.get(first.id).unwrap().status, DocumentStatus::Confirmed);
    assert_eq!(f.documents.get(broken.id).unwrap().status, DocumentStatus::Sent);
    assert_eq!(f.documents.get(last.id).unwrap().status, DocumentStatus::Confirmed);
    assert_eq!(f.logs.entries().len(), 2);
  }

  #[tokio::test]
  async fn test_import_requires_file_integration() {
    let f = fixture(StubTransports::delivering(SyncStatus::Success, None));
    let hub = f.integrations.seed(integration(IntegrationType::Webservice, true));

    assert!(matches!(
      f.dispatcher.import_confirmations(hub.id).await,
      Err(IntegrationError::ImportNotSupported(IntegrationType::Webservice))
    ));
  }

  #[tokio::test]
  async fn test_list_sync_logs_newest_first() {
    let f = fixture(StubTransports::delivering(SyncStatus::Success, None));
    f.integrations.seed(integration(IntegrationType::Webservice, true));
    let first = seed_document(&f, 1, DocumentStatus::Draft).await;
    let second = seed_document(&f, 2, DocumentStatus::Draft).await;

    f.dispatcher.export_document(f.owner, first.id, None).await.unwrap();
    f.dispatcher.export_document(f.owner, second.id, None).await.unwrap();

    let logs = f.dispatcher.list_sync_logs(f.owner, None).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].document_id, second.id);

    let only_first = f
      .dispatcher
      .list_sync_logs(f.owner, Some(first.id))
      .await
      .unwrap();
    assert_eq!(only_first.len(), 1);

    assert!(f.dispatcher.list_sync_logs(Uuid::new_v4(), None).await.unwrap().is_empty());
    assert!(
      f.dispatcher
        .list_sync_logs(Uuid::new_v4(), Some(first.id))
        .await
        .is_err()
    );
  }
}
