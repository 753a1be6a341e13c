//! In-memory ride registry with per-ride exclusive locks.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::domain::ports::{
    LockedOutcome, NewRide, RideMutation, RideRegistry, RideRegistryError,
};
use crate::domain::{Ride, RideId, RideStatus, Role, UserId};

fn poison_err<T>(_: PoisonError<T>) -> RideRegistryError {
    RideRegistryError::query("ride registry lock poisoned")
}

struct RideSlot {
    lock: Mutex<()>,
    ride: RwLock<Ride>,
}

/// Ride registry holding rides in process memory.
///
/// Each ride has its own async mutex, so locked operations on different
/// rides never wait on each other.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use mockable::DefaultClock;
/// use ride_dispatch::outbound::memory::InMemoryRideRegistry;
///
/// let registry = InMemoryRideRegistry::new(Arc::new(DefaultClock), Duration::from_secs(5));
/// assert_eq!(registry.len().expect("registry readable"), 0);
/// ```
pub struct InMemoryRideRegistry {
    rides: RwLock<HashMap<RideId, Arc<RideSlot>>>,
    clock: Arc<dyn Clock>,
    lock_timeout: Duration,
}

impl InMemoryRideRegistry {
    /// Create an empty registry; `lock_timeout` bounds every lock wait.
    pub fn new(clock: Arc<dyn Clock>, lock_timeout: Duration) -> Self {
        Self {
            rides: RwLock::new(HashMap::new()),
            clock,
            lock_timeout,
        }
    }

    /// Number of stored rides.
    ///
    /// # Errors
    ///
    /// Returns [`RideRegistryError::Query`] when the map lock is poisoned.
    pub fn len(&self) -> Result<usize, RideRegistryError> {
        Ok(self.rides.read().map_err(poison_err)?.len())
    }

    /// Whether the registry holds no rides.
    ///
    /// # Errors
    ///
    /// Returns [`RideRegistryError::Query`] when the map lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, RideRegistryError> {
        Ok(self.len()? == 0)
    }

    fn slot(&self, id: &RideId) -> Result<Option<Arc<RideSlot>>, RideRegistryError> {
        let rides = self.rides.read().map_err(poison_err)?;
        Ok(rides.get(id).cloned())
    }

    fn snapshot(&self) -> Result<Vec<Ride>, RideRegistryError> {
        let slots: Vec<Arc<RideSlot>> = {
            let rides = self.rides.read().map_err(poison_err)?;
            rides.values().cloned().collect()
        };
        slots
            .iter()
            .map(|slot| slot.ride.read().map(|ride| ride.clone()).map_err(poison_err))
            .collect()
    }

    async fn acquire<'a>(
        &self,
        id: &RideId,
        slot: &'a RideSlot,
    ) -> Result<MutexGuard<'a, ()>, RideRegistryError> {
        tokio::time::timeout(self.lock_timeout, slot.lock.lock())
            .await
            .map_err(|_| {
                debug!(ride_id = %id, timeout_ms = self.lock_timeout.as_millis(), "ride lock wait timed out");
                RideRegistryError::lock_timeout(id.to_string())
            })
    }

    /// Next `updated_at`: the clock, but always strictly after `previous`.
    fn next_version(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let floor = previous + TimeDelta::microseconds(1);
        self.clock.utc().max(floor)
    }

    fn store(&self, slot: &RideSlot, ride: Ride) -> Result<Ride, RideRegistryError> {
        let mut stored = slot.ride.write().map_err(poison_err)?;
        let stamped = ride.touched(self.next_version(stored.updated_at()));
        *stored = stamped.clone();
        Ok(stamped)
    }
}

fn participant_matches(ride: &Ride, user: &UserId, role: Role) -> bool {
    match role {
        Role::Rider => ride.is_rider(user),
        Role::Driver => ride.is_assigned_driver(user),
    }
}

#[async_trait]
impl RideRegistry for InMemoryRideRegistry {
    async fn create(&self, ride: NewRide) -> Result<Ride, RideRegistryError> {
        let created = Ride::request(
            RideId::random(),
            ride.rider,
            ride.pickup,
            ride.dropoff,
            self.clock.utc(),
        );
        let slot = Arc::new(RideSlot {
            lock: Mutex::new(()),
            ride: RwLock::new(created.clone()),
        });
        self.rides
            .write()
            .map_err(poison_err)?
            .insert(created.id(), slot);
        Ok(created)
    }

    async fn get(&self, id: &RideId) -> Result<Option<Ride>, RideRegistryError> {
        let Some(slot) = self.slot(id)? else {
            return Ok(None);
        };
        let ride = slot.ride.read().map_err(poison_err)?.clone();
        Ok(Some(ride))
    }

    async fn get_for_update(
        &self,
        id: &RideId,
        mutation: RideMutation,
    ) -> Result<LockedOutcome, RideRegistryError> {
        let Some(slot) = self.slot(id)? else {
            return Ok(LockedOutcome::Missing);
        };
        let _guard = self.acquire(id, &slot).await?;
        let current = slot.ride.read().map_err(poison_err)?.clone();
        match mutation(&current) {
            Ok(next) => Ok(LockedOutcome::Applied(self.store(&slot, next)?)),
            Err(refusal) => Ok(LockedOutcome::Rejected(refusal)),
        }
    }

    async fn update(&self, ride: &Ride) -> Result<Ride, RideRegistryError> {
        let id = ride.id();
        let Some(slot) = self.slot(&id)? else {
            return Err(RideRegistryError::query(format!("ride {id} does not exist")));
        };
        let _guard = self.acquire(&id, &slot).await?;
        let version = slot.ride.read().map_err(poison_err)?.updated_at();
        if version != ride.updated_at() {
            return Err(RideRegistryError::conflict(id.to_string()));
        }
        self.store(&slot, ride.clone())
    }

    async fn list_available(&self) -> Result<Vec<Ride>, RideRegistryError> {
        let mut open: Vec<Ride> = self
            .snapshot()?
            .into_iter()
            .filter(|ride| ride.status() == RideStatus::Requested && ride.driver().is_none())
            .collect();
        open.sort_by_key(|ride| (ride.requested_at(), ride.id()));
        Ok(open)
    }

    async fn list_history(
        &self,
        user: &UserId,
        role: Role,
        page: PageRequest,
    ) -> Result<Page<Ride>, RideRegistryError> {
        let mut finished: Vec<Ride> = self
            .snapshot()?
            .into_iter()
            .filter(|ride| ride.status().is_terminal() && participant_matches(ride, user, role))
            .collect();
        finished.sort_by(|a, b| {
            b.requested_at()
                .cmp(&a.requested_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let rows = finished
            .into_iter()
            .skip(offset)
            .take(page.fetch_limit())
            .collect();
        Ok(Page::from_overfetch(page, rows))
    }
}
