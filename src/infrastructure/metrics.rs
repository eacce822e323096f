use async_trait::async_trait;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::integration::{
  DeliveryReceipt, DocumentTransport, ExportPayload, Integration, IntegrationType,
  TransportError, TransportProvider,
};

/// Prometheus collectors for 1C synchronization
pub struct SyncMetrics {
  registry: Registry,
  attempts: IntCounterVec,
  duration: HistogramVec,
}

impl SyncMetrics {
  pub fn new() -> Result<Self, prometheus::Error> {
    let registry = Registry::new_custom(Some("docsync".to_string()), None)?;

    let attempts = IntCounterVec::new(
      Opts::new("sync_attempts_total", "Document deliveries to 1C"),
      &["transport", "status"],
    )?;
    let duration = HistogramVec::new(
      HistogramOpts::new("sync_duration_seconds", "Time spent delivering a document")
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
      &["transport"],
    )?;

    registry.register(Box::new(attempts.clone()))?;
    registry.register(Box::new(duration.clone()))?;

    #[cfg(target_os = "linux")]
    registry.register(Box::new(
      prometheus::process_collector::ProcessCollector::for_self(),
    ))?;

    Ok(Self {
      registry,
      attempts,
      duration,
    })
  }

  pub fn observe(&self, transport: IntegrationType, status: &str, seconds: f64) {
    self
      .attempts
      .with_label_values(&[transport.as_str(), status])
      .inc();
    self
      .duration
      .with_label_values(&[transport.as_str()])
      .observe(seconds);
  }

  /// Text exposition format for the `/metrics` endpoint
  pub fn render(&self) -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
  }
}

/// Records every delivery attempt of the wrapped transport
pub struct InstrumentedTransport {
  inner: Arc<dyn DocumentTransport>,
  metrics: Arc<SyncMetrics>,
}

impl InstrumentedTransport {
  pub fn new(inner: Arc<dyn DocumentTransport>, metrics: Arc<SyncMetrics>) -> Self {
    Self { inner, metrics }
  }
}

#[async_trait]
impl DocumentTransport for InstrumentedTransport {
  async fn deliver(&self, payload: &ExportPayload) -> Result<DeliveryReceipt, TransportError> {
    let started = Instant::now();
    let result = self.inner.deliver(payload).await;
    let status = match &result {
      Ok(receipt) => receipt.status.as_str(),
      Err(_) => "failed",
    };
    self
      .metrics
      .observe(self.inner.kind(), status, started.elapsed().as_secs_f64());
    result
  }

  fn kind(&self) -> IntegrationType {
    self.inner.kind()
  }
}

/// Wraps every transport handed out by `inner` in an [`InstrumentedTransport`]
pub struct InstrumentedProvider<P> {
  inner: P,
  metrics: Arc<SyncMetrics>,
}

impl<P: TransportProvider> InstrumentedProvider<P> {
  pub fn new(inner: P, metrics: Arc<SyncMetrics>) -> Self {
    Self { inner, metrics }
  }
}

impl<P: TransportProvider> TransportProvider for InstrumentedProvider<P> {
  fn transport_for(
    &self,
    integration: &Integration,
  ) -> Result<Arc<dyn DocumentTransport>, TransportError> {
    let transport = self.inner.transport_for(integration)?;
    Ok(Arc::new(InstrumentedTransport::new(
      transport,
      self.metrics.clone(),
    )))
  }
}
