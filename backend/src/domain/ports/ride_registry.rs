//! Port for the canonical ride store.
//!
//! The registry holds no business rules. It creates rides, reads them, and
//! offers two ways to write: [`RideRegistry::get_for_update`] runs a caller
//! decision while holding an exclusive per-ride lock, and
//! [`RideRegistry::update`] is a guarded write that only lands when the ride
//! is unchanged since it was read.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Location, Participant, Ride, RideId, Role, TransitionError, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ride registry adapters.
    pub enum RideRegistryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "ride registry connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ride registry query failed: {message}",
        /// Waiting for the ride's exclusive lock exceeded the configured bound.
        LockTimeout { ride_id: String } =>
            "timed out waiting for the lock on ride {ride_id}",
        /// A guarded write found the ride changed since it was read.
        Conflict { ride_id: String } =>
            "ride {ride_id} was modified concurrently",
    }
}

impl RideRegistryError {
    /// Whether retrying the same call may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::Query { .. })
    }
}

/// Fields supplied by the rider when requesting a ride.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRide {
    /// Requesting rider.
    pub rider: Participant,
    /// Pickup location.
    pub pickup: Location,
    /// Dropoff location.
    pub dropoff: Location,
}

/// Decision applied to a ride under its exclusive lock.
///
/// Returns the ride to persist, or the refusal that leaves the row untouched.
pub type RideMutation = Box<dyn FnOnce(&Ride) -> Result<Ride, TransitionError> + Send>;

/// Result of [`RideRegistry::get_for_update`].
#[derive(Debug, Clone, PartialEq)]
pub enum LockedOutcome {
    /// No ride has the requested id.
    Missing,
    /// The decision produced a ride and it was persisted.
    Applied(Ride),
    /// The decision refused the transition; nothing was written.
    Rejected(TransitionError),
}

/// Port for storing and locking rides.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideRegistry: Send + Sync {
    /// Persist a new REQUESTED ride, assigning its id and timestamps.
    async fn create(&self, ride: NewRide) -> Result<Ride, RideRegistryError>;

    /// Read a ride without locking.
    async fn get(&self, id: &RideId) -> Result<Option<Ride>, RideRegistryError>;

    /// Lock the ride exclusively, run `mutation` on the locked state and
    /// persist its result before releasing the lock.
    ///
    /// Concurrent calls for one id are serialised; calls for different ids
    /// never wait on each other. A lock wait beyond the adapter's bound fails
    /// with [`RideRegistryError::LockTimeout`].
    async fn get_for_update(
        &self,
        id: &RideId,
        mutation: RideMutation,
    ) -> Result<LockedOutcome, RideRegistryError>;

    /// Persist `ride` if the stored row still carries `ride.updated_at()`,
    /// bumping `updated_at`. A stale version fails with
    /// [`RideRegistryError::Conflict`].
    async fn update(&self, ride: &Ride) -> Result<Ride, RideRegistryError>;

    /// Open rides (REQUESTED, no driver), oldest request first.
    async fn list_available(&self) -> Result<Vec<Ride>, RideRegistryError>;

    /// Terminal rides where `user` acted as `role`, newest request first.
    async fn list_history(
        &self,
        user: &UserId,
        role: Role,
        page: PageRequest,
    ) -> Result<Page<Ride>, RideRegistryError>;
}
