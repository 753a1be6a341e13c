//! Driving ports for rider and driver ride mutations outside dispatch.

use async_trait::async_trait;

use crate::domain::{Error, Location, Principal, Ride, RideId};

/// Request to open a ride.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRideRequest {
    /// Requesting rider.
    pub principal: Principal,
    /// Pickup location.
    pub pickup: Location,
    /// Dropoff location.
    pub dropoff: Location,
}

/// Request naming a ride and the principal acting on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RideActionRequest {
    /// Acting principal.
    pub principal: Principal,
    /// Target ride.
    pub ride_id: RideId,
}

/// Driving port for ride lifecycle writes.
///
/// Errors follow a fixed precedence: a missing role or ride first, then
/// authorization against the ride, then the ride's status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideCommand: Send + Sync {
    /// Open a REQUESTED ride for the principal, who must hold the rider role.
    async fn create_ride(&self, request: CreateRideRequest) -> Result<Ride, Error>;

    /// Complete an ONGOING ride as its assigned driver.
    async fn complete_ride(&self, request: RideActionRequest) -> Result<Ride, Error>;

    /// Cancel a REQUESTED ride as its rider.
    async fn cancel_ride(&self, request: RideActionRequest) -> Result<Ride, Error>;
}
