//! Driver presence service: location reports and availability toggles.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    DriverPresenceCommand, DriverRepository, SetAvailabilityRequest, UpdateLocationRequest,
};
use crate::domain::ride_service_support::map_driver_error;
use crate::domain::{Coordinates, DriverPresence, Error, Role};

/// Service implementing the driver presence driving port.
#[derive(Clone)]
pub struct DriverPresenceService<D> {
    drivers: Arc<D>,
}

impl<D> DriverPresenceService<D> {
    /// Create a new presence service over the driver repository.
    pub fn new(drivers: Arc<D>) -> Self {
        Self { drivers }
    }
}

#[async_trait]
impl<D> DriverPresenceCommand for DriverPresenceService<D>
where
    D: DriverRepository,
{
    async fn update_location(
        &self,
        request: UpdateLocationRequest,
    ) -> Result<DriverPresence, Error> {
        request.principal.require_role(Role::Driver)?;
        let location = Coordinates::new(request.latitude, request.longitude).map_err(|err| {
            Error::invalid_input(err.to_string()).with_details(json!({
                "latitude": request.latitude,
                "longitude": request.longitude,
            }))
        })?;
        let driver_id = request.principal.user_id();
        let presence = self
            .drivers
            .upsert_location(driver_id, location)
            .await
            .map_err(map_driver_error)?;
        debug!(%driver_id, "driver location updated");
        Ok(presence)
    }

    async fn set_availability(
        &self,
        request: SetAvailabilityRequest,
    ) -> Result<DriverPresence, Error> {
        request.principal.require_role(Role::Driver)?;
        let driver_id = request.principal.user_id();
        let presence = self
            .drivers
            .set_availability(driver_id, request.available)
            .await
            .map_err(map_driver_error)?;
        debug!(%driver_id, available = request.available, "driver availability changed");
        Ok(presence)
    }
}
