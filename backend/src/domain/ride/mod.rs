//! Ride aggregate: identifiers, locations, status enums and the entity.
//!
//! A ride is created REQUESTED with no driver and UNPAID. Every later change
//! goes through the lifecycle guard in [`lifecycle`] or the payment rule in
//! [`payment`]; adapters rebuild stored rides with [`Ride::new`], which
//! re-checks the cross-field invariants.

mod lifecycle;
mod payment;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Participant, UserId};

pub use lifecycle::{RideEvent, TransitionError};
pub use payment::PaymentError;

/// Maximum accepted length of a pickup or dropoff address.
pub const MAX_ADDRESS_LENGTH: usize = 255;

/// Validation errors raised while building ride values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RideValidationError {
    /// Address was blank.
    #[error("{field} address must not be empty")]
    EmptyAddress {
        /// Which location was blank.
        field: &'static str,
    },
    /// Address exceeded [`MAX_ADDRESS_LENGTH`].
    #[error("{field} address must be at most {MAX_ADDRESS_LENGTH} characters")]
    AddressTooLong {
        /// Which location was too long.
        field: &'static str,
    },
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),
    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
    /// Unrecognised ride status.
    #[error("unknown ride status `{0}`")]
    UnknownStatus(String),
    /// Unrecognised payment status.
    #[error("unknown payment status `{0}`")]
    UnknownPaymentStatus(String),
    /// Unrecognised payment method.
    #[error("unknown payment method `{0}`; expected CASH, CARD or WALLET")]
    UnknownPaymentMethod(String),
    /// Driver presence disagrees with the status.
    #[error("a {status} ride {expectation}")]
    DriverMismatch {
        /// Stored status.
        status: RideStatus,
        /// What the status requires of the driver field.
        expectation: &'static str,
    },
    /// Payment recorded on a ride that is not completed.
    #[error("only completed rides can be paid, ride is {0}")]
    PaidBeforeCompletion(RideStatus),
    /// Payment method and payment status disagree.
    #[error("payment method must be present exactly when the ride is paid")]
    PaymentMethodMismatch,
    /// `updated_at` precedes `requested_at`.
    #[error("ride updated before it was requested")]
    UpdatedBeforeRequested,
}

/// Ride identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RideId(Uuid);

impl RideId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RideId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate and build coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`RideValidationError::LatitudeOutOfRange`] or
    /// [`RideValidationError::LongitudeOutOfRange`] for values outside their
    /// ranges, including NaN and infinities.
    ///
    /// # Examples
    /// ```
    /// use ride_dispatch::domain::Coordinates;
    ///
    /// assert!(Coordinates::new(51.5, -0.12).is_ok());
    /// assert!(Coordinates::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, RideValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(RideValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(RideValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A named place with coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    address: String,
    coordinates: Coordinates,
}

impl Location {
    /// Validate and build a location. `field` names the location in errors.
    ///
    /// # Errors
    ///
    /// Returns [`RideValidationError::EmptyAddress`] or
    /// [`RideValidationError::AddressTooLong`].
    pub fn new(
        field: &'static str,
        address: impl Into<String>,
        coordinates: Coordinates,
    ) -> Result<Self, RideValidationError> {
        let address = address.into().trim().to_owned();
        if address.is_empty() {
            return Err(RideValidationError::EmptyAddress { field });
        }
        if address.chars().count() > MAX_ADDRESS_LENGTH {
            return Err(RideValidationError::AddressTooLong { field });
        }
        Ok(Self {
            address,
            coordinates,
        })
    }

    /// Human-readable address.
    #[must_use]
    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    /// Coordinates of the location.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $error:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$variant_meta])* $variant, )+
        }

        impl $name {
            /// Upper-case wire and storage name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RideValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(RideValidationError::$error(other.to_owned())),
                }
            }
        }
    };
}

wire_enum! {
    /// Ride lifecycle status.
    RideStatus, UnknownStatus {
        /// Waiting for a driver.
        Requested => "REQUESTED",
        /// A driver accepted and the ride is under way.
        Ongoing => "ONGOING",
        /// The assigned driver completed the ride. Absorbing.
        Completed => "COMPLETED",
        /// The rider cancelled before assignment. Absorbing.
        Cancelled => "CANCELLED",
    }
}

impl RideStatus {
    /// Whether no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

wire_enum! {
    /// Payment status of a ride.
    PaymentStatus, UnknownPaymentStatus {
        /// No payment recorded yet.
        Unpaid => "UNPAID",
        /// Payment recorded.
        Paid => "PAID",
    }
}

wire_enum! {
    /// How a ride was paid.
    PaymentMethod, UnknownPaymentMethod {
        /// Cash handed to the driver.
        Cash => "CASH",
        /// Card payment.
        Card => "CARD",
        /// In-app wallet.
        Wallet => "WALLET",
    }
}

/// Input for [`Ride::new`], used when rebuilding stored rides.
#[derive(Debug, Clone)]
pub struct RideDraft {
    /// Ride identifier.
    pub id: RideId,
    /// Requesting rider.
    pub rider: Participant,
    /// Assigned driver, if any.
    pub driver: Option<Participant>,
    /// Pickup location.
    pub pickup: Location,
    /// Dropoff location.
    pub dropoff: Location,
    /// Lifecycle status.
    pub status: RideStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Payment method, set once paid.
    pub payment_method: Option<PaymentMethod>,
    /// Request timestamp.
    pub requested_at: DateTime<Utc>,
    /// Last change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A ride request and its evolving status.
///
/// ## Invariants
/// - `driver` is `None` exactly when the status is REQUESTED or CANCELLED.
/// - PAID implies COMPLETED, and `payment_method` is set exactly when PAID.
/// - `updated_at >= requested_at`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use ride_dispatch::domain::{
///     Coordinates, Location, Participant, Ride, RideId, RideStatus, UserId,
/// };
///
/// let rider = Participant { id: UserId::random(), display_name: "Ada".to_owned() };
/// let pickup = Location::new("pickup", "1 Main St", Coordinates::new(0.0, 0.0).expect("coords"))
///     .expect("pickup");
/// let dropoff = Location::new("dropoff", "9 Elm Rd", Coordinates::new(0.1, 0.1).expect("coords"))
///     .expect("dropoff");
/// let ride = Ride::request(RideId::random(), rider, pickup, dropoff, Utc::now());
/// assert_eq!(ride.status(), RideStatus::Requested);
/// assert!(ride.driver().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    id: RideId,
    rider: Participant,
    driver: Option<Participant>,
    pickup: Location,
    dropoff: Location,
    status: RideStatus,
    payment_status: PaymentStatus,
    payment_method: Option<PaymentMethod>,
    requested_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Ride {
    /// A freshly requested ride: REQUESTED, no driver, UNPAID.
    #[must_use]
    pub fn request(
        id: RideId,
        rider: Participant,
        pickup: Location,
        dropoff: Location,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            rider,
            driver: None,
            pickup,
            dropoff,
            status: RideStatus::Requested,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            requested_at,
            updated_at: requested_at,
        }
    }

    /// Rebuild a ride from stored parts, enforcing cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`RideValidationError`] naming the violated invariant.
    pub fn new(draft: RideDraft) -> Result<Self, RideValidationError> {
        Self::try_from(draft)
    }

    /// Ride identifier.
    #[must_use]
    pub const fn id(&self) -> RideId {
        self.id
    }

    /// Requesting rider.
    #[must_use]
    pub const fn rider(&self) -> &Participant {
        &self.rider
    }

    /// Assigned driver, once accepted.
    #[must_use]
    pub const fn driver(&self) -> Option<&Participant> {
        self.driver.as_ref()
    }

    /// Pickup location.
    #[must_use]
    pub const fn pickup(&self) -> &Location {
        &self.pickup
    }

    /// Dropoff location.
    #[must_use]
    pub const fn dropoff(&self) -> &Location {
        &self.dropoff
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> RideStatus {
        self.status
    }

    /// Payment status.
    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Payment method, once paid.
    #[must_use]
    pub const fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// When the rider requested the ride.
    #[must_use]
    pub const fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// Last persisted change; doubles as the write-guard version.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` is the requesting rider.
    #[must_use]
    pub fn is_rider(&self, user: &UserId) -> bool {
        &self.rider.id == user
    }

    /// Whether `user` is the assigned driver.
    #[must_use]
    pub fn is_assigned_driver(&self, user: &UserId) -> bool {
        self.driver.as_ref().is_some_and(|driver| &driver.id == user)
    }

    /// Whether `user` is the rider or the assigned driver.
    #[must_use]
    pub fn is_participant(&self, user: &UserId) -> bool {
        self.is_rider(user) || self.is_assigned_driver(user)
    }

    /// Copy of the ride stamped with a new `updated_at`. Used by registry
    /// adapters when a write lands.
    #[must_use]
    pub fn touched(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }
}

impl TryFrom<RideDraft> for Ride {
    type Error = RideValidationError;

    fn try_from(value: RideDraft) -> Result<Self, Self::Error> {
        match (value.status, value.driver.is_some()) {
            (RideStatus::Requested | RideStatus::Cancelled, true) => {
                return Err(RideValidationError::DriverMismatch {
                    status: value.status,
                    expectation: "must not have a driver",
                });
            }
            (RideStatus::Ongoing | RideStatus::Completed, false) => {
                return Err(RideValidationError::DriverMismatch {
                    status: value.status,
                    expectation: "must have a driver",
                });
            }
            _ => {}
        }
        if value.payment_status == PaymentStatus::Paid && value.status != RideStatus::Completed {
            return Err(RideValidationError::PaidBeforeCompletion(value.status));
        }
        if (value.payment_status == PaymentStatus::Paid) != value.payment_method.is_some() {
            return Err(RideValidationError::PaymentMethodMismatch);
        }
        if value.updated_at < value.requested_at {
            return Err(RideValidationError::UpdatedBeforeRequested);
        }
        Ok(Self {
            id: value.id,
            rider: value.rider,
            driver: value.driver,
            pickup: value.pickup,
            dropoff: value.dropoff,
            status: value.status,
            payment_status: value.payment_status,
            payment_method: value.payment_method,
            requested_at: value.requested_at,
            updated_at: value.updated_at,
        })
    }
}
