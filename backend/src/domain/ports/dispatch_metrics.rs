//! Domain port surface for recording dispatch outcomes.
//!
//! The dispatch service reports every accept attempt here. Exporters may
//! publish to Prometheus or discard the events in tests.

use std::fmt;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording dispatch metrics.
    pub enum DispatchMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "dispatch metrics exporter failed: {message}",
    }
}

/// Outcome of one accept attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcceptOutcome {
    /// The caller became the ride's driver.
    Won,
    /// Another driver held the ride, or it had left REQUESTED.
    Lost,
    /// No ride had the requested id.
    Missing,
    /// The attempt failed on storage.
    Error,
}

impl AcceptOutcome {
    /// Metric label value.
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Missing => "missing",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for AcceptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Metrics recording port for dispatch outcomes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchMetrics: Send + Sync {
    /// Record the outcome of an accept attempt.
    async fn record_accept(&self, outcome: AcceptOutcome) -> Result<(), DispatchMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDispatchMetrics;

#[async_trait]
impl DispatchMetrics for NoOpDispatchMetrics {
    async fn record_accept(&self, _outcome: AcceptOutcome) -> Result<(), DispatchMetricsError> {
        Ok(())
    }
}
