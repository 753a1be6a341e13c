//! Apply pending schema migrations to the configured database.
//!
//! Reads the same `RIDES_*` settings as the server and exits non-zero when
//! no database URL is configured.

use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use ride_dispatch::RideServiceSettings;
use ride_dispatch::outbound::persistence::run_pending_migrations;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        eprintln!("tracing init failed: {error}");
    }

    let settings = RideServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let url = settings
        .database_url
        .as_deref()
        .ok_or_else(|| eyre!("RIDES_DATABASE_URL must be set to run migrations"))?;

    let applied = run_pending_migrations(url)
        .await
        .wrap_err("migration run failed")?;
    if applied.is_empty() {
        info!("schema already up to date");
    }
    for version in applied {
        info!(%version, "applied migration");
    }
    Ok(())
}
