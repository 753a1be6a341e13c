//! Driving port for driver location and availability updates.

use async_trait::async_trait;

use crate::domain::{DriverPresence, Error, Principal};

/// Request to report the driver's position.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateLocationRequest {
    /// Reporting driver.
    pub principal: Principal,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Request to toggle availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetAvailabilityRequest {
    /// Reporting driver.
    pub principal: Principal,
    /// Whether the driver takes rides.
    pub available: bool,
}

/// Driving port for driver presence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriverPresenceCommand: Send + Sync {
    /// Store the driver's position after validating coordinates.
    async fn update_location(&self, request: UpdateLocationRequest)
    -> Result<DriverPresence, Error>;

    /// Store the driver's availability.
    async fn set_availability(
        &self,
        request: SetAvailabilityRequest,
    ) -> Result<DriverPresence, Error>;
}
