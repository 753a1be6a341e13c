//! Helpers shared by the ride services: error mapping and guarded writes.

use tracing::debug;

use crate::domain::ports::{DriverRepositoryError, RideRegistry, RideRegistryError};
use crate::domain::{Error, Ride, RideId};

/// Attempts a guarded write makes before giving up on a busy ride.
pub(crate) const GUARDED_WRITE_ATTEMPTS: u32 = 3;

/// Map registry failures onto domain errors. Lock timeouts, stale writes and
/// connectivity loss are retryable; query failures are not.
pub(crate) fn map_registry_error(error: RideRegistryError) -> Error {
    match error {
        RideRegistryError::Connection { message } => {
            Error::service_unavailable(format!("ride registry unavailable: {message}"))
        }
        RideRegistryError::LockTimeout { ride_id } => Error::service_unavailable(format!(
            "ride {ride_id} is busy; retry the request"
        )),
        RideRegistryError::Conflict { ride_id } => Error::service_unavailable(format!(
            "ride {ride_id} changed while the request ran; retry the request"
        )),
        RideRegistryError::Query { message } => {
            Error::internal(format!("ride registry error: {message}"))
        }
    }
}

pub(crate) fn map_driver_error(error: DriverRepositoryError) -> Error {
    match error {
        DriverRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("driver repository unavailable: {message}"))
        }
        DriverRepositoryError::Query { message } => {
            Error::internal(format!("driver repository error: {message}"))
        }
    }
}

pub(crate) fn ride_not_found(ride_id: RideId) -> Error {
    Error::not_found(format!("ride {ride_id} not found"))
}

/// Read a ride and require that it exists.
pub(crate) async fn load_ride<R>(registry: &R, ride_id: RideId) -> Result<Ride, Error>
where
    R: RideRegistry + ?Sized,
{
    registry
        .get(&ride_id)
        .await
        .map_err(map_registry_error)?
        .ok_or_else(|| ride_not_found(ride_id))
}

/// Read, decide and write a ride with the `updated_at` guard.
///
/// A write that loses to a concurrent writer re-reads the ride and decides
/// again, so the loser observes the winner's result (for example a second
/// payment sees PAID). After [`GUARDED_WRITE_ATTEMPTS`] the conflict
/// surfaces as a retryable error.
pub(crate) async fn guarded_write<R, F>(
    registry: &R,
    ride_id: RideId,
    mut decide: F,
) -> Result<Ride, Error>
where
    R: RideRegistry + ?Sized,
    F: FnMut(&Ride) -> Result<Ride, Error> + Send,
{
    let mut attempt = 1;
    loop {
        let current = load_ride(registry, ride_id).await?;
        let next = decide(&current)?;
        match registry.update(&next).await {
            Ok(saved) => return Ok(saved),
            Err(RideRegistryError::Conflict { .. }) if attempt < GUARDED_WRITE_ATTEMPTS => {
                debug!(%ride_id, attempt, "guarded ride write lost a race, re-reading");
                attempt += 1;
            }
            Err(error) => return Err(map_registry_error(error)),
        }
    }
}
