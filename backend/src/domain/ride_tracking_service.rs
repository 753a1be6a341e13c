//! Ride tracking service: the rider sees the driver's last position.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    DriverRepository, RideActionRequest, RideRegistry, RideTracking, RideTrackingQuery,
};
use crate::domain::ride_service_support::{load_ride, map_driver_error};
use crate::domain::{Error, RideStatus};

/// Service implementing the tracking driving port.
#[derive(Clone)]
pub struct RideTrackingService<R, D> {
    registry: Arc<R>,
    drivers: Arc<D>,
}

impl<R, D> RideTrackingService<R, D> {
    /// Create a new tracking service.
    pub fn new(registry: Arc<R>, drivers: Arc<D>) -> Self {
        Self { registry, drivers }
    }
}

#[async_trait]
impl<R, D> RideTrackingQuery for RideTrackingService<R, D>
where
    R: RideRegistry,
    D: DriverRepository,
{
    async fn track_ride(&self, request: RideActionRequest) -> Result<RideTracking, Error> {
        let ride = load_ride(self.registry.as_ref(), request.ride_id).await?;
        if !ride.is_rider(request.principal.user_id()) {
            return Err(Error::unauthorized("only the rider may track this ride"));
        }
        let driver = match (ride.status(), ride.driver()) {
            (RideStatus::Ongoing, Some(driver)) => driver,
            (status, _) => {
                return Err(Error::invalid_state(format!(
                    "only ONGOING rides can be tracked, ride is {status}"
                ))
                .with_details(json!({
                    "currentStatus": status.as_str(),
                    "requiredStatus": RideStatus::Ongoing.as_str(),
                })));
            }
        };
        let presence = self
            .drivers
            .find(&driver.id)
            .await
            .map_err(map_driver_error)?;
        Ok(RideTracking {
            ride_id: ride.id(),
            driver_location: presence.as_ref().and_then(|p| p.location()),
            reported_at: presence.as_ref().and_then(|p| p.updated_at()),
        })
    }
}
