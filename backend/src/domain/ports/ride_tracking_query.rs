//! Driving port for live ride tracking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Coordinates, Error, RideId};

use super::RideActionRequest;

/// Driver position as seen by the rider of an ongoing ride.
#[derive(Debug, Clone, PartialEq)]
pub struct RideTracking {
    /// Tracked ride.
    pub ride_id: RideId,
    /// Last reported driver position, if any.
    pub driver_location: Option<Coordinates>,
    /// When the position was reported.
    pub reported_at: Option<DateTime<Utc>>,
}

/// Driving port for tracking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideTrackingQuery: Send + Sync {
    /// Driver position for the ride's rider while the ride is ONGOING.
    async fn track_ride(&self, request: RideActionRequest) -> Result<RideTracking, Error>;
}
