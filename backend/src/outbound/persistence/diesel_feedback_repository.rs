//! PostgreSQL-backed `FeedbackRepository` implementation using Diesel ORM.
//!
//! Uniqueness per `(ride_id, submitted_by)` is a table constraint; a
//! violation surfaces as [`FeedbackRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::Feedback;
use crate::domain::ports::{FeedbackRepository, FeedbackRepositoryError};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, describe_diesel_error, map_basic_pool_error,
};
use super::models::NewFeedbackRow;
use super::pool::{DbPool, PoolError};
use super::schema::ride_feedback;

/// Diesel-backed implementation of the feedback repository port.
#[derive(Clone)]
pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FeedbackRepositoryError {
    map_basic_pool_error(error, FeedbackRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, ride_id: Uuid) -> FeedbackRepositoryError {
    match classify_diesel_error(&error) {
        DieselFailure::UniqueViolation => FeedbackRepositoryError::duplicate(ride_id.to_string()),
        DieselFailure::Connection => {
            FeedbackRepositoryError::connection(describe_diesel_error(&error))
        }
        DieselFailure::LockTimeout | DieselFailure::Conflict | DieselFailure::Query => {
            FeedbackRepositoryError::query(describe_diesel_error(&error))
        }
    }
}

#[async_trait]
impl FeedbackRepository for DieselFeedbackRepository {
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ride_id = *feedback.ride_id().as_uuid();
        let row = NewFeedbackRow {
            id: Uuid::new_v4(),
            ride_id,
            submitted_by: *feedback.submitted_by().as_uuid(),
            rating: i16::from(feedback.rating().value()),
            comment: feedback.comment(),
            is_driver_feedback: feedback.is_driver_feedback(),
            submitted_at: feedback.submitted_at(),
        };

        diesel::insert_into(ride_feedback::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, ride_id))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for feedback error mapping.

    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    #[derive(Debug)]
    struct UniqueInfo;

    impl DatabaseErrorInformation for UniqueInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("ride_feedback")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("ride_feedback_one_per_submitter")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[rstest]
    fn unique_violation_is_a_duplicate() {
        let ride_id = Uuid::new_v4();
        let error = map_diesel_error(
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(UniqueInfo)),
            ride_id,
        );

        assert_eq!(
            error,
            FeedbackRepositoryError::duplicate(ride_id.to_string())
        );
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(error, FeedbackRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }
}
