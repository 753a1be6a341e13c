//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `RIDES_*` environment variables or a config
//! file, in that order of precedence. Apart from the cookie opt-out every
//! field is optional; accessors apply the defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;
const MIN_LOCK_TIMEOUT_MS: u64 = 1;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address `{value}`: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Runtime settings of the ride dispatch service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RIDES")]
pub struct RideServiceSettings {
    /// PostgreSQL connection URL. When absent the service keeps rides in
    /// memory.
    pub database_url: Option<String>,
    /// Rides per history page, clamped to `1..=100`.
    pub history_page_size: Option<usize>,
    /// Upper bound on waiting for a ride's exclusive lock, in milliseconds.
    pub lock_timeout_ms: Option<u64>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// File holding the session cookie key.
    pub session_key_file: Option<PathBuf>,
    /// Drop the `Secure` flag from session cookies, for plain-HTTP local runs.
    #[ortho_config(default = false)]
    pub cookie_insecure: bool,
}

impl RideServiceSettings {
    /// History page size with the default applied and clamped to `1..=100`.
    #[must_use]
    pub fn history_page_size(&self) -> usize {
        self.history_page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Bound on the exclusive-lock wait, never below one millisecond.
    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(
            self.lock_timeout_ms
                .unwrap_or(DEFAULT_LOCK_TIMEOUT_MS)
                .max(MIN_LOCK_TIMEOUT_MS),
        )
    }

    /// Parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse as `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Maximum pooled connections.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE).max(1)
    }

    /// Session key file location.
    #[must_use]
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether cookies are marked `Secure`; on unless `cookie_insecure` is set.
    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        !self.cookie_insecure
    }
}
