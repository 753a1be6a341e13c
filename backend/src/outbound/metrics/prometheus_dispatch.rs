//! Prometheus adapter for dispatch outcomes.
//!
//! Registers a counter with the registry served at `/metrics`.

use async_trait::async_trait;
use prometheus::{IntCounterVec, Opts, Registry};

use crate::domain::ports::{AcceptOutcome, DispatchMetrics, DispatchMetricsError};

/// Prometheus-backed dispatch metrics recorder.
///
/// # Metric
///
/// - **Name**: `rides_accept_attempts_total`
/// - **Type**: Counter
/// - **Labels**: `outcome` is `won`, `lost`, `missing` or `error`
pub struct PrometheusDispatchMetrics {
    accept_attempts_total: IntCounterVec,
}

impl PrometheusDispatchMetrics {
    /// Create and register metrics with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let accept_attempts_total = IntCounterVec::new(
            Opts::new(
                "rides_accept_attempts_total",
                "Ride accept attempts by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(accept_attempts_total.clone()))?;
        Ok(Self {
            accept_attempts_total,
        })
    }
}

#[async_trait]
impl DispatchMetrics for PrometheusDispatchMetrics {
    async fn record_accept(&self, outcome: AcceptOutcome) -> Result<(), DispatchMetricsError> {
        self.accept_attempts_total
            .get_metric_with_label_values(&[outcome.as_label()])
            .map_err(|err| DispatchMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }
}
