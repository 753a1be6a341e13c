//! In-memory driver presence store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{DriverRepository, DriverRepositoryError};
use crate::domain::{Coordinates, DriverPresence, UserId};

fn poison_err<T>(_: PoisonError<T>) -> DriverRepositoryError {
    DriverRepositoryError::query("driver store lock poisoned")
}

/// Driver repository holding presence rows in process memory.
pub struct InMemoryDriverRepository {
    drivers: RwLock<HashMap<UserId, DriverPresence>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryDriverRepository {
    /// Create an empty store stamping writes with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            drivers: RwLock::new(HashMap::new()),
            clock,
        }
    }

    fn upsert(
        &self,
        driver_id: &UserId,
        change: impl FnOnce(&DriverPresence) -> DriverPresence,
    ) -> Result<DriverPresence, DriverRepositoryError> {
        let mut drivers = self.drivers.write().map_err(poison_err)?;
        let current = drivers
            .get(driver_id)
            .cloned()
            .unwrap_or_else(|| DriverPresence::unknown(driver_id.clone()));
        let next = change(&current);
        drivers.insert(driver_id.clone(), next.clone());
        Ok(next)
    }
}

#[async_trait]
impl DriverRepository for InMemoryDriverRepository {
    async fn upsert_location(
        &self,
        driver_id: &UserId,
        location: Coordinates,
    ) -> Result<DriverPresence, DriverRepositoryError> {
        let now = self.clock.utc();
        self.upsert(driver_id, |current| {
            DriverPresence::new(
                driver_id.clone(),
                current.is_available(),
                Some(location),
                Some(now),
            )
        })
    }

    async fn set_availability(
        &self,
        driver_id: &UserId,
        available: bool,
    ) -> Result<DriverPresence, DriverRepositoryError> {
        let now = self.clock.utc();
        self.upsert(driver_id, |current| {
            DriverPresence::new(driver_id.clone(), available, current.location(), Some(now))
        })
    }

    async fn find(
        &self,
        driver_id: &UserId,
    ) -> Result<Option<DriverPresence>, DriverRepositoryError> {
        let drivers = self.drivers.read().map_err(poison_err)?;
        Ok(drivers.get(driver_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::test_support::{at, fixture_clock};

    #[fixture]
    fn repo() -> InMemoryDriverRepository {
        InMemoryDriverRepository::new(fixture_clock(60))
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_driver_has_no_presence(repo: InMemoryDriverRepository) {
        assert_eq!(repo.find(&UserId::random()).await.expect("find"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn first_location_creates_unavailable_row(repo: InMemoryDriverRepository) {
        let driver = UserId::random();
        let coords = Coordinates::new(40.7, -74.0).expect("valid coordinates");

        let presence = repo
            .upsert_location(&driver, coords)
            .await
            .expect("upsert");

        assert!(!presence.is_available());
        assert_eq!(presence.location(), Some(coords));
        assert_eq!(presence.updated_at(), Some(at(60)));
    }

    #[rstest]
    #[tokio::test]
    async fn availability_keeps_last_position(repo: InMemoryDriverRepository) {
        let driver = UserId::random();
        let coords = Coordinates::new(40.7, -74.0).expect("valid coordinates");
        repo.upsert_location(&driver, coords).await.expect("upsert");

        let presence = repo
            .set_availability(&driver, true)
            .await
            .expect("availability");

        assert!(presence.is_available());
        assert_eq!(presence.location(), Some(coords));
        assert_eq!(repo.find(&driver).await.expect("find"), Some(presence));
    }
}
