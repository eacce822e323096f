use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use encoding_rs::Encoding;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsync::{
  adapters::http::{
    ApiRouteDependencies, RequestIdMiddleware, configure_api_routes, health_handler,
    metrics_handler,
  },
  domain::auth::{AuthService, AuthServiceConfig},
  domain::catalog::CatalogService,
  domain::commerce::CommerceService,
  domain::document::{DocumentService, DocumentSettings},
  domain::integration::{IntegrationDefaults, IntegrationService, SyncDispatcher, SyncSettings},
  infrastructure::{
    config::{Config, RedisConfig},
    metrics::{InstrumentedProvider, SyncMetrics},
    onec::{FileConfirmationSource, OneCTransportFactory},
    persistence::postgres::{
      PostgresCartRepository, PostgresCompanyRepository, PostgresDocumentRepository,
      PostgresDocumentSequenceRepository, PostgresIntegrationRepository, PostgresItemRepository,
      PostgresOrderRepository, PostgresPaymentRepository, PostgresSessionRepository,
      PostgresSyncLogRepository, PostgresUserRepository,
    },
    security::{AesCredentialEncryption, Argon2PasswordHasher},
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docsync=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting docsync");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    anyhow::anyhow!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    )
  })?
  .context("Could not connect to database")?;
  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  let session_repo = match &config.redis {
    Some(redis_config) => match connect_redis(redis_config).await {
      Ok(redis_conn) => {
        tracing::info!("Redis session cache enabled");
        Arc::new(PostgresSessionRepository::new(db_pool.clone(), redis_conn))
      }
      Err(e) => {
        tracing::warn!(error = %e, "Redis unavailable, sessions are served from PostgreSQL only");
        Arc::new(PostgresSessionRepository::without_redis(db_pool.clone()))
      }
    },
    None => Arc::new(PostgresSessionRepository::without_redis(db_pool.clone())),
  };

  // Initialize repositories
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let company_repo = Arc::new(PostgresCompanyRepository::new(db_pool.clone()));
  let item_repo = Arc::new(PostgresItemRepository::new(db_pool.clone()));
  let cart_repo = Arc::new(PostgresCartRepository::new(db_pool.clone()));
  let order_repo = Arc::new(PostgresOrderRepository::new(db_pool.clone()));
  let payment_repo = Arc::new(PostgresPaymentRepository::new(db_pool.clone()));
  let document_repo = Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
  let sequence_repo = Arc::new(PostgresDocumentSequenceRepository::new(db_pool.clone()));
  let integration_repo = Arc::new(PostgresIntegrationRepository::new(db_pool.clone()));
  let sync_log_repo = Arc::new(PostgresSyncLogRepository::new(db_pool.clone()));

  // Initialize domain services
  let auth_service = Arc::new(AuthService::new(
    user_repo,
    session_repo,
    Arc::new(Argon2PasswordHasher::new()?),
    AuthServiceConfig {
      session_ttl_seconds: config.security.session_ttl_seconds as i64,
      password_min_length: config.security.password_min_length,
      staff_bins: config.security.staff_bins.clone(),
    },
  ));

  let catalog_service = Arc::new(CatalogService::new(company_repo.clone(), item_repo.clone()));
  let commerce_service = Arc::new(CommerceService::new(
    cart_repo,
    order_repo.clone(),
    payment_repo,
    item_repo,
  ));
  let document_service = Arc::new(DocumentService::new(
    document_repo.clone(),
    sequence_repo,
    order_repo,
    company_repo.clone(),
    DocumentSettings {
      default_vat_rate: config.documents.default_vat_rate,
      prefixes: config.documents.prefixes.clone(),
    },
  ));

  // 1C passwords are encrypted at rest
  let credentials = Arc::new(
    AesCredentialEncryption::new(&config.security.encryption_key_base64)
      .context("Invalid security.encryption_key_base64")?,
  );

  let integration_service = Arc::new(IntegrationService::new(
    integration_repo.clone(),
    credentials.clone(),
    IntegrationDefaults {
      export_path: config.onec.default_export_path.clone(),
      import_path: config.onec.default_import_path.clone(),
      file_format: config.onec.default_file_format,
    },
  ));

  // 1C transports, instrumented for /metrics
  let metrics = Arc::new(SyncMetrics::new()?);
  let csv_encoding = Encoding::for_label(config.onec.csv_encoding.as_bytes())
    .with_context(|| format!("Unknown CSV encoding {}", config.onec.csv_encoding))?;
  let transports = InstrumentedProvider::new(
    OneCTransportFactory::from_config(&config.onec, credentials)?,
    metrics.clone(),
  );

  let dispatcher = Arc::new(SyncDispatcher::new(
    integration_repo,
    sync_log_repo,
    document_repo,
    company_repo,
    Arc::new(transports),
    Arc::new(FileConfirmationSource::new(csv_encoding)),
    SyncSettings {
      batch_size: config.onec.batch_size,
      max_log_entries: config.onec.max_log_entries,
    },
  ));

  let api = ApiRouteDependencies::new(
    auth_service,
    catalog_service,
    commerce_service,
    document_service,
    integration_service,
    dispatcher,
  );

  let rate_limit = config.rate_limit.clone();
  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .app_data(web::Data::new(db_pool.clone()))
      .app_data(web::Data::new(metrics.clone()))
      .service(
        web::scope("/api/v1").configure(|cfg| configure_api_routes(cfg, &api, &rate_limit)),
      )
      .route("/health", web::get().to(health_handler))
      .route("/metrics", web::get().to(metrics_handler))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await?;

  Ok(())
}

async fn connect_redis(config: &RedisConfig) -> anyhow::Result<redis::aio::ConnectionManager> {
  let client = redis::Client::open(config.url.clone()).context("Invalid Redis URL")?;

  tokio::time::timeout(
    Duration::from_secs(config.connect_timeout_seconds),
    client.get_connection_manager(),
  )
  .await
  .map_err(|_| {
    anyhow::anyhow!(
      "Redis connection timed out after {} seconds",
      config.connect_timeout_seconds
    )
  })?
  .with_context(|| format!("Could not connect to Redis at {}", config.url))
}
