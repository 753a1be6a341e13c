//! Composition of the HTTP state from configured adapters.
//!
//! A configured pool selects the Diesel adapters; otherwise the server runs
//! on the in-memory adapters. Dispatch metrics go to Prometheus when the
//! `metrics` feature is on and a registry is configured.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use ride_dispatch::domain::ports::{DispatchMetrics, NoOpDispatchMetrics};
use ride_dispatch::inbound::http::state::{HttpState, StateAdapters};
use ride_dispatch::outbound::memory::{
    InMemoryDriverRepository, InMemoryFeedbackRepository, InMemoryRideRegistry,
};
#[cfg(feature = "metrics")]
use ride_dispatch::outbound::metrics::PrometheusDispatchMetrics;
use ride_dispatch::outbound::persistence::{
    DieselDriverRepository, DieselFeedbackRepository, DieselRideRegistry,
};

use super::ServerConfig;

#[cfg(feature = "metrics")]
fn dispatch_metrics(config: &ServerConfig) -> Arc<dyn DispatchMetrics> {
    let Some(prometheus) = config.prometheus.as_ref() else {
        return Arc::new(NoOpDispatchMetrics);
    };
    match PrometheusDispatchMetrics::new(&prometheus.registry) {
        Ok(metrics) => Arc::new(metrics),
        Err(error) => {
            warn!(%error, "dispatch metrics registration failed; recording disabled");
            Arc::new(NoOpDispatchMetrics)
        }
    }
}

#[cfg(not(feature = "metrics"))]
fn dispatch_metrics(_config: &ServerConfig) -> Arc<dyn DispatchMetrics> {
    Arc::new(NoOpDispatchMetrics)
}

/// Build the handler state for `config`.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let metrics = dispatch_metrics(config);

    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL ride store");
            HttpState::from_adapters(StateAdapters {
                registry: Arc::new(DieselRideRegistry::new(pool.clone(), config.lock_timeout)),
                feedback: Arc::new(DieselFeedbackRepository::new(pool.clone())),
                drivers: Arc::new(DieselDriverRepository::new(pool.clone())),
                metrics,
                clock,
                history_page_size: config.history_page_size,
            })
        }
        None => {
            warn!("no database configured; rides are kept in memory");
            HttpState::from_adapters(StateAdapters {
                registry: Arc::new(InMemoryRideRegistry::new(
                    clock.clone(),
                    config.lock_timeout,
                )),
                feedback: Arc::new(InMemoryFeedbackRepository::new()),
                drivers: Arc::new(InMemoryDriverRepository::new(clock.clone())),
                metrics,
                clock,
                history_page_size: config.history_page_size,
            })
        }
    }
}
