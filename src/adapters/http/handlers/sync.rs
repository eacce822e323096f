use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{BulkExportRequest, ExportRequest, SyncLogQuery},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::integration::{
  BulkExportCommand, BulkExportUseCase, ExportDocumentCommand, ExportDocumentUseCase,
  ListSyncLogsCommand, ListSyncLogsUseCase,
};

/// POST /api/v1/documents/{id}/export
///
/// The body is optional; without an `integration_id` the first active
/// integration is used.
pub async fn export_document_handler(
  document_id: web::Path<Uuid>,
  request: Option<web::Json<ExportRequest>>,
  use_case: web::Data<Arc<ExportDocumentUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let request = request.map(web::Json::into_inner).unwrap_or_default();

  let response = use_case
    .execute(ExportDocumentCommand {
      user_id: user.id,
      document_id: document_id.into_inner(),
      integration_id: request.integration_id,
    })
    .await?;

  Ok(HttpResponse::Ok().json(response))
}

/// POST /api/v1/documents/bulk-export
pub async fn bulk_export_handler(
  request: web::Json<BulkExportRequest>,
  use_case: web::Data<Arc<BulkExportUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  request.validate()?;

  let request = request.into_inner();
  let response = use_case
    .execute(BulkExportCommand {
      user_id: user.id,
      document_ids: request.document_ids,
      integration_id: request.integration_id,
    })
    .await?;

  Ok(HttpResponse::Ok().json(response))
}

/// GET /api/v1/sync-logs?document_id=
pub async fn list_sync_logs_handler(
  query: web::Query<SyncLogQuery>,
  use_case: web::Data<Arc<ListSyncLogsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let logs = use_case
    .execute(ListSyncLogsCommand {
      user_id: user.id,
      document_id: query.into_inner().document_id,
    })
    .await?;
  Ok(HttpResponse::Ok().json(logs))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::handlers::testing::{CUSTOMER_BIN, auth_service, registered};
  use crate::adapters::http::middleware::AuthMiddleware;
  use crate::domain::commerce::CommerceService;
  use crate::domain::document::{
    CreateDocumentData, DocumentService, DocumentSettings, DocumentType, NumberPrefixes, VatRate,
  };
  use crate::domain::integration::{
    FileFormat, IntegrationType, SyncDispatcher, SyncSettings, SyncStatus,
  };
  use crate::test_support::{
    InMemoryCatalog, InMemoryCommerce, InMemoryDocuments, InMemoryIntegrations, InMemorySyncLogs,
    StubConfirmations, StubTransports, sample_integration,
  };
  use actix_web::{
    App,
    http::StatusCode,
    test::{self, TestRequest},
  };
  use rust_decimal_macros::dec;

  struct Fixture {
    token: String,
    document_id: Uuid,
    logs: InMemorySyncLogs,
    documents: InMemoryDocuments,
    dispatcher: Arc<SyncDispatcher>,
    auth: Arc<crate::domain::auth::AuthService>,
  }

  async fn fixture(transports: StubTransports) -> Fixture {
    let catalog = InMemoryCatalog::default();
    let seller = catalog.seed_company("ТОО Альфа", Some("940140000385"));
    let buyer = catalog.seed_company("Buyer LLP", None);
    let cable = catalog.seed_item(seller.id, "Кабель", dec!(100.00));

    let commerce_store = InMemoryCommerce::default();
    let commerce = CommerceService::new(
      Arc::new(commerce_store.clone()),
      Arc::new(commerce_store.clone()),
      Arc::new(commerce_store.clone()),
      Arc::new(catalog.clone()),
    );

    let auth = auth_service();
    let (user_id, token) = registered(&auth, CUSTOMER_BIN).await;
    commerce.add_to_cart(user_id, cable.id, 3).await.unwrap();
    let order = commerce.create_order(user_id).await.unwrap();

    let documents = InMemoryDocuments::default();
    let document_service = DocumentService::new(
      Arc::new(documents.clone()),
      Arc::new(documents.clone()),
      Arc::new(commerce_store),
      Arc::new(catalog.clone()),
      DocumentSettings {
        default_vat_rate: VatRate::new(dec!(12)).unwrap(),
        prefixes: NumberPrefixes::default(),
      },
    );
    let (document, _) = document_service
      .create_document_from_order(
        user_id,
        CreateDocumentData {
          order_id: order.id,
          document_type: DocumentType::Invoice,
          buyer_company_id: buyer.id,
          document_date: None,
          due_date: None,
          vat_rate: None,
          notes: None,
        },
      )
      .await
      .unwrap();

    let integrations = InMemoryIntegrations::default();
    integrations.seed(sample_integration(
      IntegrationType::Webservice,
      FileFormat::Json,
      Some("https://1c.example.kz/hs/documents"),
      "exports",
      "imports",
    ));
    let logs = InMemorySyncLogs::new(documents.clone());

    let dispatcher = Arc::new(SyncDispatcher::new(
      Arc::new(integrations),
      Arc::new(logs.clone()),
      Arc::new(documents.clone()),
      Arc::new(catalog),
      Arc::new(transports),
      Arc::new(StubConfirmations::default()),
      SyncSettings {
        batch_size: 10,
        max_log_entries: 100,
      },
    ));

    Fixture {
      token,
      document_id: document.id,
      logs,
      documents,
      dispatcher,
      auth,
    }
  }

  macro_rules! sync_app {
    ($f:expr) => {
      test::init_service(
        App::new().service(
          web::scope("")
            .wrap(AuthMiddleware::new($f.auth.clone()))
            .app_data(web::Data::new(Arc::new(ExportDocumentUseCase::new(
              $f.dispatcher.clone(),
            ))))
            .app_data(web::Data::new(Arc::new(BulkExportUseCase::new(
              $f.dispatcher.clone(),
            ))))
            .app_data(web::Data::new(Arc::new(ListSyncLogsUseCase::new(
              $f.dispatcher.clone(),
            ))))
            .route("/documents/bulk-export", web::post().to(bulk_export_handler))
            .route("/documents/{id}/export", web::post().to(export_document_handler))
            .route("/sync-logs", web::get().to(list_sync_logs_handler)),
        ),
      )
      .await
    };
  }

  #[actix_web::test]
  async fn test_export_without_body_uses_active_integration() {
    let f = fixture(StubTransports::delivering(SyncStatus::Success, Some("1C-42"))).await;
    let app = sync_app!(f);

    let req = TestRequest::post()
      .uri(&format!("/documents/{}/export", f.document_id))
      .insert_header(("Authorization", f.token.clone()))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["sync_status"], "success");
    assert_eq!(body["document_status"], "sent");
    assert_eq!(body["external_id"], "1C-42");

    let req = TestRequest::get()
      .uri(&format!("/sync-logs?document_id={}", f.document_id))
      .insert_header(("Authorization", f.token.clone()))
      .to_request();
    let logs: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(logs.as_array().unwrap().len(), 1);
    assert_eq!(logs[0]["status"], "success");
  }

  #[actix_web::test]
  async fn test_transport_failure_is_bad_gateway_and_logged() {
    let f = fixture(StubTransports::failing(503)).await;
    let app = sync_app!(f);

    let req = TestRequest::post()
      .uri(&format!("/documents/{}/export", f.document_id))
      .insert_header(("Authorization", f.token.clone()))
      .set_json(serde_json::json!({}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "sync_failed");

    let entries = f.logs.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, SyncStatus::Failed);
    assert_eq!(
      f.documents.get(f.document_id).unwrap().status.as_str(),
      "draft"
    );
  }

  #[actix_web::test]
  async fn test_bulk_export_reports_each_document() {
    let f = fixture(StubTransports::delivering(SyncStatus::Pending, None)).await;
    let app = sync_app!(f);

    let req = TestRequest::post()
      .uri("/documents/bulk-export")
      .insert_header(("Authorization", f.token.clone()))
      .set_json(serde_json::json!({ "document_ids": [f.document_id, Uuid::new_v4()] }))
      .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["succeeded"], 1);
    assert_eq!(body["failed"], 1);

    let req = TestRequest::post()
      .uri("/documents/bulk-export")
      .insert_header(("Authorization", f.token.clone()))
      .set_json(serde_json::json!({ "document_ids": [] }))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::BAD_REQUEST
    );
  }
}
