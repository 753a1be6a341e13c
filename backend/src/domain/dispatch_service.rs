//! Dispatch service: first driver to accept an open ride wins.
//!
//! Acceptance re-checks `REQUESTED` with no driver while the registry holds
//! the ride's exclusive lock, so two drivers can never both observe an open
//! ride and both win. Every refusal under the lock, including rides that have
//! already finished, is reported as `ride_unavailable`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AcceptOutcome, DispatchCommand, DispatchMetrics, LockedOutcome, RideActionRequest,
    RideRegistry,
};
use crate::domain::ride_service_support::{map_registry_error, ride_not_found};
use crate::domain::{Error, Principal, Ride, Role};

/// Service implementing the dispatch driving port.
#[derive(Clone)]
pub struct DispatchService<R, M: ?Sized> {
    registry: Arc<R>,
    metrics: Arc<M>,
}

impl<R, M: ?Sized> DispatchService<R, M> {
    /// Create a new dispatch service.
    pub fn new(registry: Arc<R>, metrics: Arc<M>) -> Self {
        Self { registry, metrics }
    }
}

impl<R, M> DispatchService<R, M>
where
    M: DispatchMetrics + ?Sized,
{
    async fn record(&self, outcome: AcceptOutcome) {
        if let Err(error) = self.metrics.record_accept(outcome).await {
            warn!(%outcome, %error, "failed to record dispatch metric");
        }
    }
}

#[async_trait]
impl<R, M> DispatchCommand for DispatchService<R, M>
where
    R: RideRegistry,
    M: DispatchMetrics + ?Sized,
{
    async fn accept_ride(&self, request: RideActionRequest) -> Result<Ride, Error> {
        request.principal.require_role(Role::Driver)?;
        let ride_id = request.ride_id;
        let driver = request.principal.as_participant();
        let driver_id = driver.id.clone();

        let outcome = self
            .registry
            .get_for_update(&ride_id, Box::new(move |current| current.accept(driver)))
            .await;

        let (result, metric) = match outcome {
            Ok(LockedOutcome::Applied(ride)) => {
                info!(%ride_id, %driver_id, "driver assigned to ride");
                (Ok(ride), AcceptOutcome::Won)
            }
            Ok(LockedOutcome::Rejected(refusal)) => {
                debug!(%ride_id, %driver_id, reason = %refusal, "accept refused");
                (
                    Err(Error::ride_unavailable(format!(
                        "ride {ride_id} is no longer available"
                    ))),
                    AcceptOutcome::Lost,
                )
            }
            Ok(LockedOutcome::Missing) => (Err(ride_not_found(ride_id)), AcceptOutcome::Missing),
            Err(error) => {
                warn!(%ride_id, %driver_id, %error, "accept failed in the ride registry");
                (Err(map_registry_error(error)), AcceptOutcome::Error)
            }
        };
        self.record(metric).await;
        result
    }

    async fn list_available_rides(&self, principal: Principal) -> Result<Vec<Ride>, Error> {
        principal.require_role(Role::Driver)?;
        self.registry
            .list_available()
            .await
            .map_err(map_registry_error)
    }
}

#[cfg(test)]
#[path = "dispatch_service_tests.rs"]
mod tests;
