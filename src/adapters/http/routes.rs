use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase,
};
use crate::application::catalog::{
  CreateCompanyUseCase, CreateItemUseCase, GetCompanyUseCase, GetItemUseCase,
  ListCompaniesUseCase, ListItemsUseCase,
};
use crate::application::commerce::{
  AddToCartUseCase, CreateOrderUseCase, CreatePaymentUseCase, GetCartUseCase, GetOrderUseCase,
  ListOrdersUseCase, ListPaymentsUseCase, RemoveFromCartUseCase,
};
use crate::application::document::{
  ChangeDocumentStatusUseCase, CreateDocumentUseCase, DeleteDocumentUseCase, GetDocumentUseCase,
  ListDocumentsUseCase, UpdateDocumentUseCase,
};
use crate::application::integration::{
  BulkExportUseCase, CreateIntegrationUseCase, DeleteIntegrationUseCase, ExportDocumentUseCase,
  GetIntegrationUseCase, ImportConfirmationsUseCase, ListIntegrationsUseCase,
  ListSyncLogsUseCase, UpdateIntegrationUseCase,
};
use crate::domain::auth::AuthService;
use crate::domain::catalog::CatalogService;
use crate::domain::commerce::CommerceService;
use crate::domain::document::DocumentService;
use crate::domain::integration::{IntegrationService, SyncDispatcher};
use crate::infrastructure::config::RateLimitConfig;

use super::handlers::{auth, catalog, commerce, documents, integrations, sync};
use super::middleware::AuthMiddleware;

/// Everything the `/api/v1` routes hand to their handlers
#[derive(Clone)]
pub struct ApiRouteDependencies {
  pub auth_service: Arc<AuthService>,

  // Auth
  pub register_use_case: Arc<RegisterUserUseCase>,
  pub login_use_case: Arc<LoginUserUseCase>,
  pub logout_use_case: Arc<LogoutUserUseCase>,
  pub get_user_use_case: Arc<GetCurrentUserUseCase>,

  // Catalog
  pub list_companies_use_case: Arc<ListCompaniesUseCase>,
  pub get_company_use_case: Arc<GetCompanyUseCase>,
  pub create_company_use_case: Arc<CreateCompanyUseCase>,
  pub list_items_use_case: Arc<ListItemsUseCase>,
  pub get_item_use_case: Arc<GetItemUseCase>,
  pub create_item_use_case: Arc<CreateItemUseCase>,

  // Cart, orders, payments
  pub get_cart_use_case: Arc<GetCartUseCase>,
  pub add_to_cart_use_case: Arc<AddToCartUseCase>,
  pub remove_from_cart_use_case: Arc<RemoveFromCartUseCase>,
  pub create_order_use_case: Arc<CreateOrderUseCase>,
  pub list_orders_use_case: Arc<ListOrdersUseCase>,
  pub get_order_use_case: Arc<GetOrderUseCase>,
  pub create_payment_use_case: Arc<CreatePaymentUseCase>,
  pub list_payments_use_case: Arc<ListPaymentsUseCase>,

  // Documents
  pub list_documents_use_case: Arc<ListDocumentsUseCase>,
  pub create_document_use_case: Arc<CreateDocumentUseCase>,
  pub get_document_use_case: Arc<GetDocumentUseCase>,
  pub update_document_use_case: Arc<UpdateDocumentUseCase>,
  pub delete_document_use_case: Arc<DeleteDocumentUseCase>,
  pub change_document_status_use_case: Arc<ChangeDocumentStatusUseCase>,

  // 1C synchronization
  pub export_document_use_case: Arc<ExportDocumentUseCase>,
  pub bulk_export_use_case: Arc<BulkExportUseCase>,
  pub list_sync_logs_use_case: Arc<ListSyncLogsUseCase>,
  pub import_confirmations_use_case: Arc<ImportConfirmationsUseCase>,
  pub list_integrations_use_case: Arc<ListIntegrationsUseCase>,
  pub get_integration_use_case: Arc<GetIntegrationUseCase>,
  pub create_integration_use_case: Arc<CreateIntegrationUseCase>,
  pub update_integration_use_case: Arc<UpdateIntegrationUseCase>,
  pub delete_integration_use_case: Arc<DeleteIntegrationUseCase>,
}

impl ApiRouteDependencies {
  /// Builds every use case on top of the domain services
  pub fn new(
    auth_service: Arc<AuthService>,
    catalog_service: Arc<CatalogService>,
    commerce_service: Arc<CommerceService>,
    document_service: Arc<DocumentService>,
    integration_service: Arc<IntegrationService>,
    dispatcher: Arc<SyncDispatcher>,
  ) -> Self {
    Self {
      register_use_case: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
      login_use_case: Arc::new(LoginUserUseCase::new(auth_service.clone())),
      logout_use_case: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
      get_user_use_case: Arc::new(GetCurrentUserUseCase::new(auth_service.clone())),
      auth_service,

      list_companies_use_case: Arc::new(ListCompaniesUseCase::new(catalog_service.clone())),
      get_company_use_case: Arc::new(GetCompanyUseCase::new(catalog_service.clone())),
      create_company_use_case: Arc::new(CreateCompanyUseCase::new(catalog_service.clone())),
      list_items_use_case: Arc::new(ListItemsUseCase::new(catalog_service.clone())),
      get_item_use_case: Arc::new(GetItemUseCase::new(catalog_service.clone())),
      create_item_use_case: Arc::new(CreateItemUseCase::new(catalog_service)),

      get_cart_use_case: Arc::new(GetCartUseCase::new(commerce_service.clone())),
      add_to_cart_use_case: Arc::new(AddToCartUseCase::new(commerce_service.clone())),
      remove_from_cart_use_case: Arc::new(RemoveFromCartUseCase::new(commerce_service.clone())),
      create_order_use_case: Arc::new(CreateOrderUseCase::new(commerce_service.clone())),
      list_orders_use_case: Arc::new(ListOrdersUseCase::new(commerce_service.clone())),
      get_order_use_case: Arc::new(GetOrderUseCase::new(commerce_service.clone())),
      create_payment_use_case: Arc::new(CreatePaymentUseCase::new(commerce_service.clone())),
      list_payments_use_case: Arc::new(ListPaymentsUseCase::new(commerce_service)),

      list_documents_use_case: Arc::new(ListDocumentsUseCase::new(document_service.clone())),
      create_document_use_case: Arc::new(CreateDocumentUseCase::new(document_service.clone())),
      get_document_use_case: Arc::new(GetDocumentUseCase::new(document_service.clone())),
      update_document_use_case: Arc::new(UpdateDocumentUseCase::new(document_service.clone())),
      delete_document_use_case: Arc::new(DeleteDocumentUseCase::new(document_service.clone())),
      change_document_status_use_case: Arc::new(ChangeDocumentStatusUseCase::new(
        document_service,
      )),

      export_document_use_case: Arc::new(ExportDocumentUseCase::new(dispatcher.clone())),
      bulk_export_use_case: Arc::new(BulkExportUseCase::new(dispatcher.clone())),
      list_sync_logs_use_case: Arc::new(ListSyncLogsUseCase::new(dispatcher.clone())),
      import_confirmations_use_case: Arc::new(ImportConfirmationsUseCase::new(dispatcher)),
      list_integrations_use_case: Arc::new(ListIntegrationsUseCase::new(
        integration_service.clone(),
      )),
      get_integration_use_case: Arc::new(GetIntegrationUseCase::new(integration_service.clone())),
      create_integration_use_case: Arc::new(CreateIntegrationUseCase::new(
        integration_service.clone(),
      )),
      update_integration_use_case: Arc::new(UpdateIntegrationUseCase::new(
        integration_service.clone(),
      )),
      delete_integration_use_case: Arc::new(DeleteIntegrationUseCase::new(integration_service)),
    }
  }
}

/// Mounts the whole JSON API; expected under the `/api/v1` scope
pub fn configure_api_routes(
  cfg: &mut web::ServiceConfig,
  deps: &ApiRouteDependencies,
  rate_limit: &RateLimitConfig,
) {
  cfg.service(web::scope("/auth").configure(|cfg| configure_auth_routes(cfg, deps, rate_limit)));
  configure_catalog_routes(cfg, deps);
  configure_commerce_routes(cfg, deps);
  configure_document_routes(cfg, deps);
  configure_integration_routes(cfg, deps);
}

/// Configure authentication routes
///
/// # Routes
///
/// - POST /register - Register a new user account (rate limited)
/// - POST /login - Authenticate and create a session (rate limited)
/// - POST /logout - Invalidate the current session
/// - GET /me - Get current user information
pub fn configure_auth_routes(
  cfg: &mut web::ServiceConfig,
  deps: &ApiRouteDependencies,
  rate_limit: &RateLimitConfig,
) {
  cfg
    .app_data(web::Data::new(deps.register_use_case.clone()))
    .app_data(web::Data::new(deps.login_use_case.clone()))
    .app_data(web::Data::new(deps.logout_use_case.clone()))
    .app_data(web::Data::new(deps.get_user_use_case.clone()));

  let limiter = GovernorConfigBuilder::default()
    .seconds_per_request(rate_limit.auth_replenish_seconds)
    .burst_size(rate_limit.auth_burst_size)
    .finish();

  match limiter {
    Some(limiter) => {
      cfg
        .service(
          web::resource("/register")
            .wrap(Governor::new(&limiter))
            .route(web::post().to(auth::register_handler)),
        )
        .service(
          web::resource("/login")
            .wrap(Governor::new(&limiter))
            .route(web::post().to(auth::login_handler)),
        );
    }
    None => {
      tracing::error!("Invalid auth rate limit settings, serving auth routes unthrottled");
      cfg
        .route("/register", web::post().to(auth::register_handler))
        .route("/login", web::post().to(auth::login_handler));
    }
  }

  cfg
    .route("/logout", web::post().to(auth::logout_handler))
    .route("/me", web::get().to(auth::get_current_user_handler));
}

/// Configure catalog routes
///
/// Browsing is public; creating companies and items under `/admin` is staff-only.
pub fn configure_catalog_routes(cfg: &mut web::ServiceConfig, deps: &ApiRouteDependencies) {
  cfg
    .app_data(web::Data::new(deps.list_companies_use_case.clone()))
    .app_data(web::Data::new(deps.get_company_use_case.clone()))
    .app_data(web::Data::new(deps.list_items_use_case.clone()))
    .app_data(web::Data::new(deps.get_item_use_case.clone()))
    .route("/companies", web::get().to(catalog::list_companies_handler))
    .route("/companies/{id}", web::get().to(catalog::get_company_handler))
    .route("/items", web::get().to(catalog::list_items_handler))
    .route("/items/{id}", web::get().to(catalog::get_item_handler))
    .service(
      web::scope("/admin")
        .wrap(AuthMiddleware::new(deps.auth_service.clone()))
        .app_data(web::Data::new(deps.create_company_use_case.clone()))
        .app_data(web::Data::new(deps.create_item_use_case.clone()))
        .route("/companies", web::post().to(catalog::create_company_handler))
        .route("/items", web::post().to(catalog::create_item_handler)),
    );
}

/// Configure cart, order and payment routes (authenticated)
pub fn configure_commerce_routes(cfg: &mut web::ServiceConfig, deps: &ApiRouteDependencies) {
  cfg
    .service(
      web::scope("/cart")
        .wrap(AuthMiddleware::new(deps.auth_service.clone()))
        .app_data(web::Data::new(deps.get_cart_use_case.clone()))
        .app_data(web::Data::new(deps.add_to_cart_use_case.clone()))
        .app_data(web::Data::new(deps.remove_from_cart_use_case.clone()))
        .route("", web::get().to(commerce::get_cart_handler))
        .route("/add", web::post().to(commerce::add_to_cart_handler))
        .route("/remove", web::post().to(commerce::remove_from_cart_handler)),
    )
    .service(
      web::scope("/orders")
        .wrap(AuthMiddleware::new(deps.auth_service.clone()))
        .app_data(web::Data::new(deps.create_order_use_case.clone()))
        .app_data(web::Data::new(deps.list_orders_use_case.clone()))
        .app_data(web::Data::new(deps.get_order_use_case.clone()))
        .route("", web::get().to(commerce::list_orders_handler))
        .route("", web::post().to(commerce::create_order_handler))
        .route("/{id}", web::get().to(commerce::get_order_handler)),
    )
    .service(
      web::scope("/payments")
        .wrap(AuthMiddleware::new(deps.auth_service.clone()))
        .app_data(web::Data::new(deps.create_payment_use_case.clone()))
        .app_data(web::Data::new(deps.list_payments_use_case.clone()))
        .route("", web::get().to(commerce::list_payments_handler))
        .route("", web::post().to(commerce::create_payment_handler)),
    );
}

/// Configure document and sync routes (authenticated)
///
/// # Routes
///
/// - GET, POST /documents
/// - POST /documents/bulk-export
/// - GET, PATCH, DELETE /documents/{id}
/// - POST /documents/{id}/status
/// - POST /documents/{id}/export
/// - GET /sync-logs
pub fn configure_document_routes(cfg: &mut web::ServiceConfig, deps: &ApiRouteDependencies) {
  cfg
    .service(
      web::scope("/documents")
        .wrap(AuthMiddleware::new(deps.auth_service.clone()))
        .app_data(web::Data::new(deps.list_documents_use_case.clone()))
        .app_data(web::Data::new(deps.create_document_use_case.clone()))
        .app_data(web::Data::new(deps.get_document_use_case.clone()))
        .app_data(web::Data::new(deps.update_document_use_case.clone()))
        .app_data(web::Data::new(deps.delete_document_use_case.clone()))
        .app_data(web::Data::new(deps.change_document_status_use_case.clone()))
        .app_data(web::Data::new(deps.export_document_use_case.clone()))
        .app_data(web::Data::new(deps.bulk_export_use_case.clone()))
        .route("", web::get().to(documents::list_documents_handler))
        .route("", web::post().to(documents::create_document_handler))
        .route("/bulk-export", web::post().to(sync::bulk_export_handler))
        .route("/{id}", web::get().to(documents::get_document_handler))
        .route("/{id}", web::patch().to(documents::update_document_handler))
        .route("/{id}", web::delete().to(documents::delete_document_handler))
        .route("/{id}/status", web::post().to(documents::change_status_handler))
        .route("/{id}/export", web::post().to(sync::export_document_handler)),
    )
    .service(
      web::scope("/sync-logs")
        .wrap(AuthMiddleware::new(deps.auth_service.clone()))
        .app_data(web::Data::new(deps.list_sync_logs_use_case.clone()))
        .route("", web::get().to(sync::list_sync_logs_handler)),
    );
}

/// Configure 1C integration management (staff)
pub fn configure_integration_routes(cfg: &mut web::ServiceConfig, deps: &ApiRouteDependencies) {
  cfg.service(
    web::scope("/integrations")
      .wrap(AuthMiddleware::new(deps.auth_service.clone()))
      .app_data(web::Data::new(deps.list_integrations_use_case.clone()))
      .app_data(web::Data::new(deps.create_integration_use_case.clone()))
      .app_data(web::Data::new(deps.get_integration_use_case.clone()))
      .app_data(web::Data::new(deps.update_integration_use_case.clone()))
      .app_data(web::Data::new(deps.delete_integration_use_case.clone()))
      .app_data(web::Data::new(deps.import_confirmations_use_case.clone()))
      .route("", web::get().to(integrations::list_integrations_handler))
      .route("", web::post().to(integrations::create_integration_handler))
      .route("/{id}", web::get().to(integrations::get_integration_handler))
      .route("/{id}", web::put().to(integrations::update_integration_handler))
      .route("/{id}", web::delete().to(integrations::delete_integration_handler))
      .route(
        "/{id}/import",
        web::post().to(integrations::import_confirmations_handler),
      ),
  );
}
