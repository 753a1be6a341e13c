//! Port for driver presence persistence.

use async_trait::async_trait;

use crate::domain::{Coordinates, DriverPresence, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by driver repository adapters.
    pub enum DriverRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "driver repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "driver repository query failed: {message}",
    }
}

/// Port for reading and writing driver presence.
///
/// Writes upsert: the first update for a driver creates their row as
/// unavailable with no position, then applies the change.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// Store the driver's latest position.
    async fn upsert_location(
        &self,
        driver_id: &UserId,
        location: Coordinates,
    ) -> Result<DriverPresence, DriverRepositoryError>;

    /// Store the driver's availability flag.
    async fn set_availability(
        &self,
        driver_id: &UserId,
        available: bool,
    ) -> Result<DriverPresence, DriverRepositoryError>;

    /// Read the driver's presence, if they ever reported in.
    async fn find(&self, driver_id: &UserId)
    -> Result<Option<DriverPresence>, DriverRepositoryError>;
}
