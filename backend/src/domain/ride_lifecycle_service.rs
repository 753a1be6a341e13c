//! Ride lifecycle service: create, complete, cancel and look up rides.
//!
//! Cancel competes with driver acceptance for the same REQUESTED ride, so it
//! runs under the registry's exclusive lock. Completion is only ever driven
//! by the assigned driver and goes through the guarded write instead.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CreateRideRequest, LockedOutcome, NewRide, RideActionRequest, RideCommand, RideQuery,
    RideRegistry,
};
use crate::domain::ride_service_support::{
    guarded_write, load_ride, map_registry_error, ride_not_found,
};
use crate::domain::{Error, Ride, Role};

/// Service implementing the ride command and query driving ports.
#[derive(Clone)]
pub struct RideLifecycleService<R> {
    registry: Arc<R>,
}

impl<R> RideLifecycleService<R> {
    /// Create a new service over the ride registry.
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl<R> RideCommand for RideLifecycleService<R>
where
    R: RideRegistry,
{
    async fn create_ride(&self, request: CreateRideRequest) -> Result<Ride, Error> {
        request.principal.require_role(Role::Rider)?;
        let ride = self
            .registry
            .create(NewRide {
                rider: request.principal.as_participant(),
                pickup: request.pickup,
                dropoff: request.dropoff,
            })
            .await
            .map_err(map_registry_error)?;
        info!(ride_id = %ride.id(), rider_id = %ride.rider().id, "ride requested");
        Ok(ride)
    }

    async fn complete_ride(&self, request: RideActionRequest) -> Result<Ride, Error> {
        request.principal.require_role(Role::Driver)?;
        let actor = request.principal.user_id();
        let ride = guarded_write(self.registry.as_ref(), request.ride_id, |current| {
            current.complete(actor).map_err(Error::from)
        })
        .await?;
        info!(ride_id = %ride.id(), driver_id = %actor, "ride completed");
        Ok(ride)
    }

    async fn cancel_ride(&self, request: RideActionRequest) -> Result<Ride, Error> {
        request.principal.require_role(Role::Rider)?;
        let ride_id = request.ride_id;
        let actor = request.principal.user_id().clone();
        let outcome = self
            .registry
            .get_for_update(&ride_id, Box::new(move |current| current.cancel(&actor)))
            .await
            .map_err(map_registry_error)?;
        match outcome {
            LockedOutcome::Applied(ride) => {
                info!(%ride_id, rider_id = %request.principal.user_id(), "ride cancelled");
                Ok(ride)
            }
            LockedOutcome::Rejected(refusal) => Err(refusal.into()),
            LockedOutcome::Missing => Err(ride_not_found(ride_id)),
        }
    }
}

#[async_trait]
impl<R> RideQuery for RideLifecycleService<R>
where
    R: RideRegistry,
{
    async fn get_ride(&self, request: RideActionRequest) -> Result<Ride, Error> {
        let ride = load_ride(self.registry.as_ref(), request.ride_id).await?;
        if !ride.is_participant(request.principal.user_id()) {
            return Err(Error::unauthorized(
                "only the rider or the assigned driver may view this ride",
            ));
        }
        Ok(ride)
    }
}

#[cfg(test)]
#[path = "ride_lifecycle_service_tests.rs"]
mod tests;
