use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;

use crate::adapters::http::errors::ApiError;
use crate::infrastructure::metrics::SyncMetrics;

#[derive(Debug, Serialize)]
struct HealthResponse {
  status: &'static str,
  database: &'static str,
  version: &'static str,
}

/// GET /health
pub async fn health_handler(pool: web::Data<PgPool>) -> HttpResponse {
  let database = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
    Ok(_) => "up",
    Err(e) => {
      tracing::warn!(error = %e, "Health check could not reach the database");
      "down"
    }
  };

  let body = HealthResponse {
    status: if database == "up" { "ok" } else { "degraded" },
    database,
    version: env!("CARGO_PKG_VERSION"),
  };

  if database == "up" {
    HttpResponse::Ok().json(body)
  } else {
    HttpResponse::ServiceUnavailable().json(body)
  }
}

/// GET /metrics
pub async fn metrics_handler(
  metrics: web::Data<Arc<SyncMetrics>>,
) -> Result<HttpResponse, ApiError> {
  let body = metrics
    .render()
    .map_err(|e| ApiError::Internal(format!("Failed to render metrics: {}", e)))?;

  Ok(
    HttpResponse::Ok()
      .content_type("text/plain; version=0.0.4")
      .body(body),
  )
}
