//! Driving port for driver assignment.

use async_trait::async_trait;

use crate::domain::{Error, Principal, Ride};

use super::RideActionRequest;

/// Driving port for the open-ride pool.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchCommand: Send + Sync {
    /// Take an open ride. At most one driver ever wins a given ride; every
    /// other caller receives `ride_unavailable`.
    async fn accept_ride(&self, request: RideActionRequest) -> Result<Ride, Error>;

    /// Open rides visible to a driver, oldest request first.
    async fn list_available_rides(&self, principal: Principal) -> Result<Vec<Ride>, Error>;
}
