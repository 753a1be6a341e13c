//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`RideRegistry`, `FeedbackRepository`, `DriverRepository`,
//! `DispatchMetrics`) are implemented by outbound adapters. Driving ports
//! (`RideCommand`, `DispatchCommand`, `PaymentCommand`, ...) are implemented
//! by the domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod dispatch_command;
mod dispatch_metrics;
mod driver_presence_command;
mod driver_repository;
mod feedback_command;
mod feedback_repository;
mod payment_command;
mod ride_command;
mod ride_history_query;
mod ride_query;
mod ride_registry;
mod ride_tracking_query;

#[cfg(test)]
pub use dispatch_command::MockDispatchCommand;
pub use dispatch_command::DispatchCommand;
#[cfg(test)]
pub use dispatch_metrics::MockDispatchMetrics;
pub use dispatch_metrics::{
    AcceptOutcome, DispatchMetrics, DispatchMetricsError, NoOpDispatchMetrics,
};
#[cfg(test)]
pub use driver_presence_command::MockDriverPresenceCommand;
pub use driver_presence_command::{
    DriverPresenceCommand, SetAvailabilityRequest, UpdateLocationRequest,
};
#[cfg(test)]
pub use driver_repository::MockDriverRepository;
pub use driver_repository::{DriverRepository, DriverRepositoryError};
#[cfg(test)]
pub use feedback_command::MockFeedbackCommand;
pub use feedback_command::{FeedbackCommand, SubmitFeedbackRequest};
#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
pub use feedback_repository::{FeedbackRepository, FeedbackRepositoryError};
#[cfg(test)]
pub use payment_command::MockPaymentCommand;
pub use payment_command::{MarkPaidRequest, PaymentCommand};
#[cfg(test)]
pub use ride_command::MockRideCommand;
pub use ride_command::{CreateRideRequest, RideActionRequest, RideCommand};
#[cfg(test)]
pub use ride_history_query::MockRideHistoryQuery;
pub use ride_history_query::{RideHistoryQuery, RideHistoryRequest};
#[cfg(test)]
pub use ride_query::MockRideQuery;
pub use ride_query::RideQuery;
#[cfg(test)]
pub use ride_registry::MockRideRegistry;
pub use ride_registry::{LockedOutcome, NewRide, RideMutation, RideRegistry, RideRegistryError};
#[cfg(test)]
pub use ride_tracking_query::MockRideTrackingQuery;
pub use ride_tracking_query::{RideTracking, RideTrackingQuery};
