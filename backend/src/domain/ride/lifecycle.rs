//! Lifecycle guard: the only way a ride's status changes.
//!
//! ```text
//! REQUESTED --accept(driver)--> ONGOING --complete(assigned driver)--> COMPLETED
//! REQUESTED --cancel(rider)---> CANCELLED
//! ```
//!
//! Each transition checks authorization before the current status, so a
//! stranger probing a ride learns nothing about its state. The functions are
//! pure; callers hold whatever lock the registry provides while they run.

use std::fmt;

use serde_json::{Value, json};

use super::{Ride, RideStatus};
use crate::domain::{Error, Participant, UserId};

/// Lifecycle events a ride reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RideEvent {
    /// A driver takes an open ride.
    Accept,
    /// The assigned driver finishes the ride.
    Complete,
    /// The rider withdraws an unassigned request.
    Cancel,
}

impl RideEvent {
    /// Status the ride must hold for the event to apply.
    #[must_use]
    pub const fn required_status(self) -> RideStatus {
        match self {
            Self::Accept | Self::Cancel => RideStatus::Requested,
            Self::Complete => RideStatus::Ongoing,
        }
    }

    /// Status the ride holds after the event.
    #[must_use]
    pub const fn target_status(self) -> RideStatus {
        match self {
            Self::Accept => RideStatus::Ongoing,
            Self::Complete => RideStatus::Completed,
            Self::Cancel => RideStatus::Cancelled,
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for RideEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Why the guard refused a transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The actor may not trigger this event on this ride.
    #[error("not permitted to {event} this ride")]
    Unauthorized {
        /// Refused event.
        event: RideEvent,
    },
    /// The ride is in the wrong status for the event.
    #[error("cannot {event} a ride that is {current}; it must be {}", event.required_status())]
    InvalidTransition {
        /// Refused event.
        event: RideEvent,
        /// Status the ride holds.
        current: RideStatus,
    },
}

impl TransitionError {
    /// Structured details for a wrong-status refusal.
    #[must_use]
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::Unauthorized { .. } => None,
            Self::InvalidTransition { event, current } => Some(json!({
                "currentStatus": current.as_str(),
                "requiredStatus": event.required_status().as_str(),
            })),
        }
    }
}

impl From<TransitionError> for Error {
    fn from(value: TransitionError) -> Self {
        match &value {
            TransitionError::Unauthorized { .. } => Self::unauthorized(value.to_string()),
            TransitionError::InvalidTransition { .. } => {
                let details = value.details();
                let error = Self::invalid_state(value.to_string());
                match details {
                    Some(details) => error.with_details(details),
                    None => error,
                }
            }
        }
    }
}

impl Ride {
    /// Assign `driver` to an open ride and move it to ONGOING.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidTransition`] unless the ride is
    /// REQUESTED with no driver.
    pub fn accept(&self, driver: Participant) -> Result<Self, TransitionError> {
        let event = RideEvent::Accept;
        if self.status != event.required_status() || self.driver.is_some() {
            return Err(TransitionError::InvalidTransition {
                event,
                current: self.status,
            });
        }
        let mut next = self.clone();
        next.driver = Some(driver);
        next.status = event.target_status();
        Ok(next)
    }

    /// Mark the ride COMPLETED on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Unauthorized`] unless `actor` is the
    /// assigned driver, then [`TransitionError::InvalidTransition`] unless
    /// the ride is ONGOING.
    pub fn complete(&self, actor: &UserId) -> Result<Self, TransitionError> {
        let event = RideEvent::Complete;
        if !self.is_assigned_driver(actor) {
            return Err(TransitionError::Unauthorized { event });
        }
        self.transition(event)
    }

    /// Cancel the ride on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Unauthorized`] unless `actor` is the
    /// rider, then [`TransitionError::InvalidTransition`] unless the ride is
    /// still REQUESTED and unassigned.
    pub fn cancel(&self, actor: &UserId) -> Result<Self, TransitionError> {
        let event = RideEvent::Cancel;
        if !self.is_rider(actor) {
            return Err(TransitionError::Unauthorized { event });
        }
        if self.driver.is_some() {
            return Err(TransitionError::InvalidTransition {
                event,
                current: self.status,
            });
        }
        self.transition(event)
    }

    fn transition(&self, event: RideEvent) -> Result<Self, TransitionError> {
        if self.status != event.required_status() {
            return Err(TransitionError::InvalidTransition {
                event,
                current: self.status,
            });
        }
        let mut next = self.clone();
        next.status = event.target_status();
        Ok(next)
    }
}
