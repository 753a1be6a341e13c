//! PostgreSQL-backed `DriverRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DriverRepository, DriverRepositoryError};
use crate::domain::{Coordinates, DriverPresence, UserId};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, describe_diesel_error, map_basic_pool_error,
};
use super::models::DriverRow;
use super::pool::{DbPool, PoolError};
use super::schema::drivers;

/// Diesel-backed implementation of the driver repository port.
#[derive(Clone)]
pub struct DieselDriverRepository {
    pool: DbPool,
}

impl DieselDriverRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DriverRepositoryError {
    map_basic_pool_error(error, DriverRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DriverRepositoryError {
    match classify_diesel_error(&error) {
        DieselFailure::Connection => DriverRepositoryError::connection(describe_diesel_error(&error)),
        _ => DriverRepositoryError::query(describe_diesel_error(&error)),
    }
}

fn row_to_presence(row: DriverRow) -> Result<DriverPresence, DriverRepositoryError> {
    let location = match (row.current_latitude, row.current_longitude) {
        (Some(latitude), Some(longitude)) => Some(
            Coordinates::new(latitude, longitude)
                .map_err(|err| DriverRepositoryError::query(format!("decode position: {err}")))?,
        ),
        (None, None) => None,
        _ => {
            return Err(DriverRepositoryError::query(format!(
                "driver {} has a partial position",
                row.id
            )));
        }
    };
    Ok(DriverPresence::new(
        UserId::from_uuid(row.id),
        row.is_available,
        location,
        Some(row.updated_at),
    ))
}

#[async_trait]
impl DriverRepository for DieselDriverRepository {
    async fn upsert_location(
        &self,
        driver_id: &UserId,
        location: Coordinates,
    ) -> Result<DriverPresence, DriverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(drivers::table)
            .values((
                drivers::id.eq(*driver_id.as_uuid()),
                drivers::current_latitude.eq(location.latitude()),
                drivers::current_longitude.eq(location.longitude()),
            ))
            .on_conflict(drivers::id)
            .do_update()
            .set((
                drivers::current_latitude.eq(excluded(drivers::current_latitude)),
                drivers::current_longitude.eq(excluded(drivers::current_longitude)),
                drivers::updated_at.eq(now),
            ))
            .returning(DriverRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_presence(row)
    }

    async fn set_availability(
        &self,
        driver_id: &UserId,
        available: bool,
    ) -> Result<DriverPresence, DriverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(drivers::table)
            .values((
                drivers::id.eq(*driver_id.as_uuid()),
                drivers::is_available.eq(available),
            ))
            .on_conflict(drivers::id)
            .do_update()
            .set((
                drivers::is_available.eq(excluded(drivers::is_available)),
                drivers::updated_at.eq(now),
            ))
            .returning(DriverRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_presence(row)
    }

    async fn find(
        &self,
        driver_id: &UserId,
    ) -> Result<Option<DriverPresence>, DriverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = drivers::table
            .filter(drivers::id.eq(driver_id.as_uuid()))
            .select(DriverRow::as_select())
            .first::<DriverRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_presence).transpose()
    }
}
