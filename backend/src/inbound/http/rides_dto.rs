//! Ride DTOs shared by the ride, payment, feedback, history and driver
//! handlers.

use pagination::{Page, PageLinks};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RideTracking;
use crate::domain::{DriverPresence, Feedback, Location, Participant, Ride};

/// Path segment naming a ride.
#[derive(Debug, Deserialize)]
pub struct RidePath {
    pub id: String,
}

/// Address plus coordinates, used in requests and responses.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationBody {
    #[schema(example = "1 Main St", max_length = 255)]
    pub address: String,
    #[schema(example = 51.5)]
    pub latitude: f64,
    #[schema(example = -0.12)]
    pub longitude: f64,
}

impl From<&Location> for LocationBody {
    fn from(value: &Location) -> Self {
        let coordinates = value.coordinates();
        Self {
            address: value.address().to_owned(),
            latitude: coordinates.latitude(),
            longitude: coordinates.longitude(),
        }
    }
}

/// Request payload for opening a ride.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideRequestBody {
    pub pickup: LocationBody,
    pub dropoff: LocationBody,
}

/// A rider or driver as recorded on the ride.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub display_name: String,
}

impl From<&Participant> for ParticipantBody {
    fn from(value: &Participant) -> Self {
        Self {
            id: value.id.to_string(),
            display_name: value.display_name.clone(),
        }
    }
}

/// Response payload describing a ride.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RideResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub rider: ParticipantBody,
    pub driver: Option<ParticipantBody>,
    pub pickup: LocationBody,
    pub dropoff: LocationBody,
    #[schema(example = "REQUESTED")]
    pub status: String,
    #[schema(example = "UNPAID")]
    pub payment_status: String,
    #[schema(example = "CARD")]
    pub payment_method: Option<String>,
    #[schema(format = "date-time")]
    pub requested_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<&Ride> for RideResponse {
    fn from(ride: &Ride) -> Self {
        Self {
            id: ride.id().to_string(),
            rider: ParticipantBody::from(ride.rider()),
            driver: ride.driver().map(ParticipantBody::from),
            pickup: LocationBody::from(ride.pickup()),
            dropoff: LocationBody::from(ride.dropoff()),
            status: ride.status().as_str().to_owned(),
            payment_status: ride.payment_status().as_str().to_owned(),
            payment_method: ride.payment_method().map(|m| m.as_str().to_owned()),
            requested_at: ride.requested_at().to_rfc3339(),
            updated_at: ride.updated_at().to_rfc3339(),
        }
    }
}

impl From<Ride> for RideResponse {
    fn from(ride: Ride) -> Self {
        Self::from(&ride)
    }
}

/// Request payload for recording a payment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidRequestBody {
    #[schema(example = "CARD")]
    pub method: String,
}

/// Request payload for submitting feedback.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequestBody {
    #[schema(minimum = 1, maximum = 5, example = 5)]
    pub rating: i64,
    #[schema(max_length = 1000)]
    pub comment: Option<String>,
}

/// Response payload for stored feedback.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    #[schema(format = "uuid")]
    pub ride_id: String,
    #[schema(format = "uuid")]
    pub submitted_by: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub is_driver_feedback: bool,
    #[schema(format = "date-time")]
    pub submitted_at: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(value: Feedback) -> Self {
        Self {
            ride_id: value.ride_id().to_string(),
            submitted_by: value.submitted_by().to_string(),
            rating: value.rating().value(),
            comment: value.comment().map(ToOwned::to_owned),
            is_driver_feedback: value.is_driver_feedback(),
            submitted_at: value.submitted_at().to_rfc3339(),
        }
    }
}

/// Driver position for the rider of an ongoing ride.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    #[schema(format = "uuid")]
    pub ride_id: String,
    pub driver_latitude: Option<f64>,
    pub driver_longitude: Option<f64>,
    #[schema(format = "date-time")]
    pub reported_at: Option<String>,
}

impl From<RideTracking> for TrackingResponse {
    fn from(value: RideTracking) -> Self {
        Self {
            ride_id: value.ride_id.to_string(),
            driver_latitude: value.driver_location.map(|c| c.latitude()),
            driver_longitude: value.driver_location.map(|c| c.longitude()),
            reported_at: value.reported_at.map(|at| at.to_rfc3339()),
        }
    }
}

/// Request payload for a driver position report.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverLocationRequestBody {
    #[schema(minimum = -90.0, maximum = 90.0)]
    pub latitude: f64,
    #[schema(minimum = -180.0, maximum = 180.0)]
    pub longitude: f64,
}

/// Request payload toggling driver availability.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverAvailabilityRequestBody {
    pub available: bool,
}

/// Response payload describing a driver's presence.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverPresenceResponse {
    #[schema(format = "uuid")]
    pub driver_id: String,
    pub available: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[schema(format = "date-time")]
    pub updated_at: Option<String>,
}

impl From<DriverPresence> for DriverPresenceResponse {
    fn from(value: DriverPresence) -> Self {
        Self {
            driver_id: value.driver_id().to_string(),
            available: value.is_available(),
            latitude: value.location().map(|c| c.latitude()),
            longitude: value.location().map(|c| c.longitude()),
            updated_at: value.updated_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Query string of the history endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryQuery {
    /// One-based page number; defaults to 1.
    pub page: Option<u32>,
}

/// Navigation links for a history page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryLinks {
    #[serde(rename = "self")]
    pub self_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl From<PageLinks> for HistoryLinks {
    fn from(value: PageLinks) -> Self {
        Self {
            self_: value.self_,
            next: value.next,
            prev: value.prev,
        }
    }
}

/// One page of finished rides.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub items: Vec<RideResponse>,
    pub page: u32,
    pub page_size: usize,
    pub has_next: bool,
    pub links: HistoryLinks,
}

impl HistoryResponse {
    pub(super) fn new(page: Page<Ride>, links: PageLinks) -> Self {
        let page = page.map(RideResponse::from);
        Self {
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            has_next: page.has_next,
            links: HistoryLinks::from(links),
        }
    }
}
