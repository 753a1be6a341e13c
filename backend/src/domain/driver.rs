//! Driver presence: availability flag and last reported position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinates, UserId};

/// Current availability and position of a driver.
///
/// A driver without a stored row is reported as unavailable with no
/// position; the first location or availability update creates the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPresence {
    driver_id: UserId,
    is_available: bool,
    location: Option<Coordinates>,
    updated_at: Option<DateTime<Utc>>,
}

impl DriverPresence {
    /// Build a presence record.
    #[must_use]
    pub const fn new(
        driver_id: UserId,
        is_available: bool,
        location: Option<Coordinates>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            driver_id,
            is_available,
            location,
            updated_at,
        }
    }

    /// Presence for a driver that has never reported in.
    #[must_use]
    pub const fn unknown(driver_id: UserId) -> Self {
        Self::new(driver_id, false, None, None)
    }

    /// Driver identifier.
    #[must_use]
    pub const fn driver_id(&self) -> &UserId {
        &self.driver_id
    }

    /// Whether the driver is taking rides.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.is_available
    }

    /// Last reported position.
    #[must_use]
    pub const fn location(&self) -> Option<Coordinates> {
        self.location
    }

    /// When presence last changed.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
