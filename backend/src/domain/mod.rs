//! Domain primitives, the lifecycle guard and the services behind the ports.
//!
//! Purpose: define strongly typed ride entities and the rules that move them
//! through REQUESTED, ONGOING, COMPLETED and CANCELLED. Services implement the
//! driving ports in [`ports`] on top of the driven ports, so adapters never
//! see a rule and rules never see a database.
//!
//! Public surface:
//! - Error (alias to `error::Error`) - transport-agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`) - stable error identifier.
//! - Ride, RideStatus, PaymentStatus, PaymentMethod - the ride aggregate.
//! - Principal, Role, UserId, Participant - who is acting.
//! - Feedback, Rating - post-ride feedback.
//! - DriverPresence - driver availability and position.

pub mod driver;
pub mod error;
pub mod feedback;
pub mod ports;
pub mod principal;
pub mod ride;
pub mod trace_id;

mod dispatch_service;
mod driver_presence_service;
mod feedback_service;
mod payment_service;
mod ride_history_service;
mod ride_lifecycle_service;
mod ride_service_support;
mod ride_tracking_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::dispatch_service::DispatchService;
pub use self::driver::DriverPresence;
pub use self::driver_presence_service::DriverPresenceService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::feedback::{
    Feedback, FeedbackComment, FeedbackDraft, FeedbackError, FeedbackValidationError, Rating,
};
pub use self::feedback_service::FeedbackService;
pub use self::payment_service::PaymentService;
pub use self::principal::{Participant, Principal, PrincipalValidationError, Role, UserId};
pub use self::ride::{
    Coordinates, Location, PaymentError, PaymentMethod, PaymentStatus, Ride, RideDraft, RideEvent,
    RideId, RideStatus, RideValidationError, TransitionError,
};
pub use self::ride_history_service::RideHistoryService;
pub use self::ride_lifecycle_service::RideLifecycleService;
pub use self::ride_tracking_service::RideTrackingService;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ride_dispatch::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("driver role required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
