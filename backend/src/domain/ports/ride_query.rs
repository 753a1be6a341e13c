//! Driving port for reading a single ride.

use async_trait::async_trait;

use crate::domain::{Error, Ride};

use super::RideActionRequest;

/// Driving port for ride lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideQuery: Send + Sync {
    /// Return the ride to its rider or assigned driver.
    ///
    /// Fails `not_found` for unknown ids and `unauthorized` for anyone else.
    async fn get_ride(&self, request: RideActionRequest) -> Result<Ride, Error>;
}
