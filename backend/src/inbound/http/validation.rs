//! Shared validation helpers for inbound HTTP adapters.
//!
//! Turns raw path and body values into domain values, reporting failures as
//! `invalid_input` errors with `{ field, value, code }` details.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Coordinates, Error, Location, PaymentMethod, RideId, Role};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidRole,
    InvalidPaymentMethod,
    InvalidCoordinates,
    InvalidAddress,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidRole => "invalid_role",
            ErrorCode::InvalidPaymentMethod => "invalid_payment_method",
            ErrorCode::InvalidCoordinates => "invalid_coordinates",
            ErrorCode::InvalidAddress => "invalid_address",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn invalid(field: FieldName, message: impl Into<String>, code: ErrorCode, value: &str) -> Error {
    Error::invalid_input(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_ride_id(value: &str) -> Result<RideId, Error> {
    let field = FieldName::new("id");
    Uuid::parse_str(value)
        .map(RideId::from_uuid)
        .map_err(|_| invalid(field, "id must be a valid UUID", ErrorCode::InvalidUuid, value))
}

pub(crate) fn parse_role(value: &str) -> Result<Role, Error> {
    let field = FieldName::new("role");
    value.parse::<Role>().map_err(|_| {
        invalid(
            field,
            "role must be rider or driver",
            ErrorCode::InvalidRole,
            value,
        )
    })
}

pub(crate) fn parse_payment_method(value: &str) -> Result<PaymentMethod, Error> {
    let field = FieldName::new("method");
    value.parse::<PaymentMethod>().map_err(|error| {
        invalid(field, error.to_string(), ErrorCode::InvalidPaymentMethod, value)
    })
}

pub(crate) fn parse_coordinates(
    field: FieldName,
    latitude: f64,
    longitude: f64,
) -> Result<Coordinates, Error> {
    Coordinates::new(latitude, longitude).map_err(|error| {
        invalid(
            field,
            error.to_string(),
            ErrorCode::InvalidCoordinates,
            &format!("{latitude},{longitude}"),
        )
    })
}

pub(crate) fn parse_location(
    field: &'static str,
    address: &str,
    latitude: f64,
    longitude: f64,
) -> Result<Location, Error> {
    let coordinates = parse_coordinates(FieldName::new(field), latitude, longitude)?;
    Location::new(field, address, coordinates).map_err(|error| {
        invalid(
            FieldName::new(field),
            error.to_string(),
            ErrorCode::InvalidAddress,
            address,
        )
    })
}
