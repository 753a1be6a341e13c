//! PostgreSQL-backed `RideRegistry` implementation using Diesel ORM.
//!
//! `get_for_update` holds a `SELECT ... FOR UPDATE` row lock for the length
//! of one transaction and bounds the wait with `SET LOCAL lock_timeout`.
//! `update` is a guarded write keyed on the `updated_at` the caller read.
//! Every write sets `updated_at` to `GREATEST(now(), updated_at + 1µs)` so
//! the version strictly increases even inside one transaction timestamp.

use std::time::Duration;

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Timestamptz;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    LockedOutcome, NewRide, RideMutation, RideRegistry, RideRegistryError,
};
use crate::domain::{
    Coordinates, Location, Participant, Ride, RideDraft, RideId, RideStatus, Role, UserId,
};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, describe_diesel_error, map_basic_pool_error,
};
use super::models::{NewRideRow, RideChangeset, RideRow};
use super::pool::{DbPool, PoolError};
use super::schema::rides;

const NEXT_VERSION_SQL: &str = "GREATEST(now(), updated_at + interval '1 microsecond')";
const TERMINAL_STATUSES: [&str; 2] = [
    RideStatus::Completed.as_str(),
    RideStatus::Cancelled.as_str(),
];

/// Diesel-backed implementation of the ride registry port.
#[derive(Clone)]
pub struct DieselRideRegistry {
    pool: DbPool,
    lock_timeout: Duration,
}

impl DieselRideRegistry {
    /// Create a registry; `lock_timeout` bounds every row-lock wait.
    pub fn new(pool: DbPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }

    fn lock_timeout_statement(&self) -> String {
        lock_timeout_statement(self.lock_timeout)
    }
}

/// `SET LOCAL lock_timeout` in whole milliseconds, rounded up.
///
/// PostgreSQL reads `0` as "wait forever", so the value never drops below
/// one millisecond.
fn lock_timeout_statement(timeout: Duration) -> String {
    let millis = timeout.as_nanos().div_ceil(1_000_000).max(1);
    format!("SET LOCAL lock_timeout = '{millis}ms'")
}

fn map_pool_error(error: PoolError) -> RideRegistryError {
    map_basic_pool_error(error, RideRegistryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, ride_id: Option<Uuid>) -> RideRegistryError {
    let id = || ride_id.map(|id| id.to_string()).unwrap_or_default();
    match classify_diesel_error(&error) {
        DieselFailure::Connection => RideRegistryError::connection(describe_diesel_error(&error)),
        DieselFailure::LockTimeout => RideRegistryError::lock_timeout(id()),
        DieselFailure::Conflict => RideRegistryError::conflict(id()),
        DieselFailure::UniqueViolation | DieselFailure::Query => {
            RideRegistryError::query(describe_diesel_error(&error))
        }
    }
}

/// Error type threaded through the locked transaction.
#[derive(Debug)]
enum LockedTxError {
    Diesel(diesel::result::Error),
    Decode(RideRegistryError),
}

impl From<diesel::result::Error> for LockedTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn location(
    field: &'static str,
    address: String,
    latitude: f64,
    longitude: f64,
) -> Result<Location, RideRegistryError> {
    Coordinates::new(latitude, longitude)
        .and_then(|coords| Location::new(field, address, coords))
        .map_err(|err| RideRegistryError::query(format!("decode {field}: {err}")))
}

/// Convert a database row into a validated domain ride.
fn row_to_ride(row: RideRow) -> Result<Ride, RideRegistryError> {
    let RideRow {
        id,
        rider_id,
        rider_name,
        driver_id,
        driver_name,
        pickup_address,
        pickup_latitude,
        pickup_longitude,
        dropoff_address,
        dropoff_latitude,
        dropoff_longitude,
        status,
        payment_status,
        payment_method,
        requested_at,
        updated_at,
    } = row;

    let driver = match (driver_id, driver_name) {
        (Some(driver_id), Some(display_name)) => Some(Participant {
            id: UserId::from_uuid(driver_id),
            display_name,
        }),
        (None, None) => None,
        _ => {
            return Err(RideRegistryError::query(format!(
                "ride {id} has a partial driver reference"
            )));
        }
    };
    let decode = |err: crate::domain::RideValidationError| {
        RideRegistryError::query(format!("decode ride {id}: {err}"))
    };

    Ride::new(RideDraft {
        id: RideId::from_uuid(id),
        rider: Participant {
            id: UserId::from_uuid(rider_id),
            display_name: rider_name,
        },
        driver,
        pickup: location("pickup", pickup_address, pickup_latitude, pickup_longitude)?,
        dropoff: location("dropoff", dropoff_address, dropoff_latitude, dropoff_longitude)?,
        status: status.parse().map_err(decode)?,
        payment_status: payment_status.parse().map_err(decode)?,
        payment_method: payment_method
            .map(|method| method.parse())
            .transpose()
            .map_err(decode)?,
        requested_at,
        updated_at,
    })
    .map_err(decode)
}

fn changeset(ride: &Ride) -> RideChangeset<'_> {
    RideChangeset {
        driver_id: ride.driver().map(|driver| *driver.id.as_uuid()),
        driver_name: ride.driver().map(|driver| driver.display_name.as_str()),
        status: ride.status().as_str(),
        payment_status: ride.payment_status().as_str(),
        payment_method: ride.payment_method().map(|method| method.as_str()),
    }
}

async fn write_locked(
    conn: &mut AsyncPgConnection,
    ride: &Ride,
) -> Result<RideRow, diesel::result::Error> {
    diesel::update(rides::table.filter(rides::id.eq(ride.id().as_uuid())))
        .set((
            changeset(ride),
            rides::updated_at.eq(sql::<Timestamptz>(NEXT_VERSION_SQL)),
        ))
        .returning(RideRow::as_returning())
        .get_result(conn)
        .await
}

#[async_trait]
impl RideRegistry for DieselRideRegistry {
    async fn create(&self, ride: NewRide) -> Result<Ride, RideRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = Uuid::new_v4();
        let row = NewRideRow {
            id,
            rider_id: *ride.rider.id.as_uuid(),
            rider_name: &ride.rider.display_name,
            pickup_address: ride.pickup.address(),
            pickup_latitude: ride.pickup.coordinates().latitude(),
            pickup_longitude: ride.pickup.coordinates().longitude(),
            dropoff_address: ride.dropoff.address(),
            dropoff_latitude: ride.dropoff.coordinates().latitude(),
            dropoff_longitude: ride.dropoff.coordinates().longitude(),
        };

        let stored = diesel::insert_into(rides::table)
            .values(&row)
            .returning(RideRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(id)))?;
        row_to_ride(stored)
    }

    async fn get(&self, id: &RideId) -> Result<Option<Ride>, RideRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = rides::table
            .filter(rides::id.eq(id.as_uuid()))
            .select(RideRow::as_select())
            .first::<RideRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, Some(*id.as_uuid())))?;

        row.map(row_to_ride).transpose()
    }

    async fn get_for_update(
        &self,
        id: &RideId,
        mutation: RideMutation,
    ) -> Result<LockedOutcome, RideRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ride_id = *id.as_uuid();
        let set_lock_timeout = self.lock_timeout_statement();

        let result = conn
            .transaction::<_, LockedTxError, _>(|conn| {
                async move {
                    diesel::sql_query(set_lock_timeout).execute(conn).await?;

                    let row = rides::table
                        .filter(rides::id.eq(ride_id))
                        .select(RideRow::as_select())
                        .for_update()
                        .first::<RideRow>(conn)
                        .await
                        .optional()?;
                    let Some(row) = row else {
                        return Ok(LockedOutcome::Missing);
                    };
                    let current = row_to_ride(row).map_err(LockedTxError::Decode)?;

                    match mutation(&current) {
                        Err(refusal) => Ok(LockedOutcome::Rejected(refusal)),
                        Ok(next) => {
                            let written = write_locked(conn, &next).await?;
                            row_to_ride(written)
                                .map(LockedOutcome::Applied)
                                .map_err(LockedTxError::Decode)
                        }
                    }
                }
                .scope_boxed()
            })
            .await;

        result.map_err(|err| match err {
            LockedTxError::Diesel(error) => {
                let mapped = map_diesel_error(error, Some(ride_id));
                debug!(ride_id = %ride_id, error = %mapped, "locked ride update failed");
                mapped
            }
            LockedTxError::Decode(error) => error,
        })
    }

    async fn update(&self, ride: &Ride) -> Result<Ride, RideRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ride_id = *ride.id().as_uuid();

        let written = diesel::update(
            rides::table
                .filter(rides::id.eq(ride_id))
                .filter(rides::updated_at.eq(ride.updated_at())),
        )
        .set((
            changeset(ride),
            rides::updated_at.eq(sql::<Timestamptz>(NEXT_VERSION_SQL)),
        ))
        .returning(RideRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, Some(ride_id)))?;

        match written {
            Some(row) => row_to_ride(row),
            None => Err(RideRegistryError::conflict(ride_id.to_string())),
        }
    }

    async fn list_available(&self) -> Result<Vec<Ride>, RideRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RideRow> = rides::table
            .filter(rides::status.eq(RideStatus::Requested.as_str()))
            .filter(rides::driver_id.is_null())
            .order((rides::requested_at.asc(), rides::id.asc()))
            .select(RideRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter().map(row_to_ride).collect()
    }

    async fn list_history(
        &self,
        user: &UserId,
        role: Role,
        page: PageRequest,
    ) -> Result<Page<Ride>, RideRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let offset = i64::try_from(page.offset())
            .map_err(|_| RideRegistryError::query("history offset out of range"))?;
        let limit = i64::try_from(page.fetch_limit())
            .map_err(|_| RideRegistryError::query("history page size out of range"))?;

        let mut query = rides::table
            .select(RideRow::as_select())
            .filter(rides::status.eq_any(TERMINAL_STATUSES))
            .into_boxed();
        query = match role {
            Role::Rider => query.filter(rides::rider_id.eq(*user.as_uuid())),
            Role::Driver => query.filter(rides::driver_id.eq(*user.as_uuid())),
        };

        let rows: Vec<RideRow> = query
            .order((rides::requested_at.desc(), rides::id.desc()))
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        let rides = rows
            .into_iter()
            .map(row_to_ride)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::from_overfetch(page, rides))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::{Duration as ChronoDuration, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{PaymentMethod, PaymentStatus};

    #[fixture]
    fn completed_row() -> RideRow {
        let requested_at = Utc::now();
        RideRow {
            id: Uuid::new_v4(),
            rider_id: Uuid::new_v4(),
            rider_name: "Ada".to_owned(),
            driver_id: Some(Uuid::new_v4()),
            driver_name: Some("Grace".to_owned()),
            pickup_address: "1 Main St".to_owned(),
            pickup_latitude: 51.5,
            pickup_longitude: -0.12,
            dropoff_address: "9 Elm Rd".to_owned(),
            dropoff_latitude: 51.6,
            dropoff_longitude: -0.1,
            status: "COMPLETED".to_owned(),
            payment_status: "PAID".to_owned(),
            payment_method: Some("CARD".to_owned()),
            requested_at,
            updated_at: requested_at + ChronoDuration::minutes(20),
        }
    }

    #[rstest]
    fn row_conversion_restores_the_ride(completed_row: RideRow) {
        let ride = row_to_ride(completed_row.clone()).expect("valid row");

        assert_eq!(ride.id().as_uuid(), &completed_row.id);
        assert_eq!(ride.status(), RideStatus::Completed);
        assert_eq!(ride.payment_status(), PaymentStatus::Paid);
        assert_eq!(ride.payment_method(), Some(PaymentMethod::Card));
        assert_eq!(
            ride.driver().map(|driver| driver.display_name.as_str()),
            Some("Grace")
        );
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status(mut completed_row: RideRow) {
        completed_row.status = "ACCEPTED".to_owned();

        let error = row_to_ride(completed_row).expect_err("unknown status");
        assert!(matches!(error, RideRegistryError::Query { .. }));
        assert!(error.to_string().contains("ACCEPTED"));
    }

    #[rstest]
    fn row_conversion_rejects_partial_driver(mut completed_row: RideRow) {
        completed_row.driver_name = None;

        let error = row_to_ride(completed_row).expect_err("partial driver");
        assert!(error.to_string().contains("partial driver reference"));
    }

    #[rstest]
    fn row_conversion_rejects_paid_ride_without_method(mut completed_row: RideRow) {
        completed_row.payment_method = None;

        let error = row_to_ride(completed_row).expect_err("inconsistent payment");
        assert!(matches!(error, RideRegistryError::Query { .. }));
    }

    #[rstest]
    fn changeset_mirrors_the_ride(completed_row: RideRow) {
        let ride = row_to_ride(completed_row.clone()).expect("valid row");
        let changes = changeset(&ride);

        assert_eq!(changes.driver_id, completed_row.driver_id);
        assert_eq!(changes.driver_name, Some("Grace"));
        assert_eq!(changes.status, "COMPLETED");
        assert_eq!(changes.payment_status, "PAID");
        assert_eq!(changes.payment_method, Some("CARD"));
    }

    #[rstest]
    #[case(Duration::ZERO, "1ms")]
    #[case(Duration::from_micros(500), "1ms")]
    #[case(Duration::from_micros(1_500), "2ms")]
    #[case(Duration::from_millis(250), "250ms")]
    #[case(Duration::from_secs(5), "5000ms")]
    fn lock_timeout_never_disables_the_wait(#[case] timeout: Duration, #[case] rendered: &str) {
        assert_eq!(
            lock_timeout_statement(timeout),
            format!("SET LOCAL lock_timeout = '{rendered}'")
        );
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(error, RideRegistryError::Connection { .. }));
        assert!(error.is_transient());
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let error = map_diesel_error(diesel::result::Error::NotFound, None);

        assert!(matches!(error, RideRegistryError::Query { .. }));
        assert!(error.to_string().contains("record not found"));
    }
}
