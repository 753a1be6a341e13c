//! Ride dispatch service entry-point: loads settings, prepares storage and
//! serves the REST API.

mod server;

use std::time::Duration;

use actix_web::cookie::SameSite;
use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ride_dispatch::RideServiceSettings;
use ride_dispatch::inbound::http::health::HealthState;
use ride_dispatch::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server, load_session_key};

/// Build Prometheus middleware, logging and disabling it on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "Prometheus metrics disabled");
            None
        }
    }
}

async fn connect_store(settings: &RideServiceSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url.as_deref() else {
        return Ok(None);
    };
    let applied = run_pending_migrations(url)
        .await
        .map_err(std::io::Error::other)?;
    for version in applied {
        info!(%version, "applied migration");
    }
    let config = PoolConfig::new(url)
        .with_max_size(settings.pool_max_size())
        .with_connection_timeout(Duration::from_secs(10));
    let pool = DbPool::new(config).await.map_err(std::io::Error::other)?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = RideServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let key = load_session_key(&settings.session_key_file())?;

    let mut config = ServerConfig::new(key, settings.cookie_secure(), SameSite::Lax, bind_addr)
        .with_lock_timeout(settings.lock_timeout())
        .with_history_page_size(settings.history_page_size());
    if let Some(pool) = connect_store(&settings).await? {
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("rides")
            .endpoint("/metrics")
            .build()
    }));

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting ride dispatch service");
    create_server(health_state, config)?.await
}
