//! Shared Diesel error mapping for the ride adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// PostgreSQL reports an expired `lock_timeout` with this message
/// (SQLSTATE 55P03), which Diesel surfaces as an unknown database error.
const LOCK_TIMEOUT_MESSAGE: &str = "lock timeout";

/// How a failed statement should be classified by the calling adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DieselFailure {
    /// The connection dropped or could not be used.
    Connection,
    /// Waiting for a row lock exceeded `lock_timeout`.
    LockTimeout,
    /// The transaction lost a serialisation race.
    Conflict,
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// Any other failure.
    Query,
}

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Classify a Diesel error and emit debug context.
pub fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::ClosedConnection => DieselFailure::Connection,
                DatabaseErrorKind::SerializationFailure => DieselFailure::Conflict,
                DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation,
                _ if info.message().contains(LOCK_TIMEOUT_MESSAGE) => DieselFailure::LockTimeout,
                _ => DieselFailure::Query,
            }
        }
        DieselError::BrokenTransactionManager => {
            debug!("diesel transaction manager broken");
            DieselFailure::Connection
        }
        _ => {
            debug!(
                error_type = %std::any::type_name_of_val(error),
                "diesel operation failed"
            );
            DieselFailure::Query
        }
    }
}

/// Stable, non-leaking message for a Diesel error.
pub fn describe_diesel_error(error: &DieselError) -> &'static str {
    match error {
        DieselError::NotFound => "record not found",
        DieselError::QueryBuilderError(_) => "database query error",
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => "database connection error",
        _ => "database error",
    }
}
