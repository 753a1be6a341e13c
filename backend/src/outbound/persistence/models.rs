//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{drivers, ride_feedback, rides};

/// Row struct for reading from the rides table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rides)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RideRow {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub rider_name: String,
    pub driver_id: Option<Uuid>,
    pub driver_name: Option<String>,
    pub pickup_address: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub dropoff_address: String,
    pub dropoff_latitude: f64,
    pub dropoff_longitude: f64,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new ride requests. Status, payment status and
/// timestamps take their column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rides)]
pub(crate) struct NewRideRow<'a> {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub rider_name: &'a str,
    pub pickup_address: &'a str,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub dropoff_address: &'a str,
    pub dropoff_latitude: f64,
    pub dropoff_longitude: f64,
}

/// Mutable ride columns. `updated_at` is set separately by the database.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = rides)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RideChangeset<'a> {
    pub driver_id: Option<Uuid>,
    pub driver_name: Option<&'a str>,
    pub status: &'a str,
    pub payment_status: &'a str,
    pub payment_method: Option<&'a str>,
}

/// Insertable struct for feedback submissions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ride_feedback)]
pub(crate) struct NewFeedbackRow<'a> {
    pub id: Uuid,
    pub ride_id: Uuid,
    pub submitted_by: Uuid,
    pub rating: i16,
    pub comment: Option<&'a str>,
    pub is_driver_feedback: bool,
    pub submitted_at: DateTime<Utc>,
}

/// Row struct for reading from the drivers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = drivers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DriverRow {
    pub id: Uuid,
    pub is_available: bool,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub updated_at: DateTime<Utc>,
}
