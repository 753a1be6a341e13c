//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate them with `diesel print-schema`
//! or update them by hand.

diesel::table! {
    /// Driver presence, one row per driver that ever reported in.
    drivers (id) {
        /// Driver user id.
        id -> Uuid,
        /// Whether the driver is taking rides.
        is_available -> Bool,
        /// Last reported latitude.
        current_latitude -> Nullable<Float8>,
        /// Last reported longitude.
        current_longitude -> Nullable<Float8>,
        /// Last presence change.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rides and their lifecycle state. Rows are never deleted.
    rides (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Requesting rider.
        rider_id -> Uuid,
        /// Rider display name captured at request time.
        rider_name -> Varchar,
        /// Assigned driver, set on accept.
        driver_id -> Nullable<Uuid>,
        /// Driver display name captured at accept time.
        driver_name -> Nullable<Varchar>,
        /// Pickup address.
        pickup_address -> Varchar,
        /// Pickup latitude.
        pickup_latitude -> Float8,
        /// Pickup longitude.
        pickup_longitude -> Float8,
        /// Dropoff address.
        dropoff_address -> Varchar,
        /// Dropoff latitude.
        dropoff_latitude -> Float8,
        /// Dropoff longitude.
        dropoff_longitude -> Float8,
        /// Lifecycle status (`REQUESTED`, `ONGOING`, `COMPLETED`, `CANCELLED`).
        status -> Varchar,
        /// `UNPAID` or `PAID`.
        payment_status -> Varchar,
        /// `CASH`, `CARD` or `WALLET` once paid.
        payment_method -> Nullable<Varchar>,
        /// Request timestamp.
        requested_at -> Timestamptz,
        /// Version stamp for guarded writes; strictly increases on every write.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Post-ride feedback, unique per ride and submitter.
    ride_feedback (id) {
        /// Primary key.
        id -> Uuid,
        /// Rated ride.
        ride_id -> Uuid,
        /// Submitting participant.
        submitted_by -> Uuid,
        /// Rating from 1 to 5.
        rating -> Int2,
        /// Optional comment.
        comment -> Nullable<Varchar>,
        /// Whether the assigned driver submitted it.
        is_driver_feedback -> Bool,
        /// Submission timestamp.
        submitted_at -> Timestamptz,
    }
}

diesel::joinable!(ride_feedback -> rides (ride_id));
diesel::allow_tables_to_appear_in_same_query!(drivers, rides, ride_feedback);
