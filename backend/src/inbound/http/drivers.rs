//! Driver presence HTTP handlers.
//!
//! ```text
//! PUT /api/v1/drivers/me/location
//! PUT /api/v1/drivers/me/availability
//! ```

use actix_web::{put, web};

use crate::domain::ports::{SetAvailabilityRequest, UpdateLocationRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::rides_dto::{
    DriverAvailabilityRequestBody, DriverLocationRequestBody, DriverPresenceResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Report the driver's current position.
#[utoipa::path(
    put,
    path = "/api/v1/drivers/me/location",
    request_body = DriverLocationRequestBody,
    responses(
        (status = 200, description = "Position stored", body = DriverPresenceResponse),
        (status = 400, description = "Coordinates out of range", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Driver role required", body = ErrorSchema)
    ),
    tags = ["drivers"],
    operation_id = "updateDriverLocation",
    security(("SessionCookie" = []))
)]
#[put("/drivers/me/location")]
pub async fn update_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DriverLocationRequestBody>,
) -> ApiResult<web::Json<DriverPresenceResponse>> {
    let principal = session.require_principal()?;
    let DriverLocationRequestBody {
        latitude,
        longitude,
    } = payload.into_inner();

    let presence = state
        .drivers
        .update_location(UpdateLocationRequest {
            principal,
            latitude,
            longitude,
        })
        .await?;

    Ok(web::Json(DriverPresenceResponse::from(presence)))
}

/// Toggle whether the driver takes rides.
#[utoipa::path(
    put,
    path = "/api/v1/drivers/me/availability",
    request_body = DriverAvailabilityRequestBody,
    responses(
        (status = 200, description = "Availability stored", body = DriverPresenceResponse),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Driver role required", body = ErrorSchema)
    ),
    tags = ["drivers"],
    operation_id = "setDriverAvailability",
    security(("SessionCookie" = []))
)]
#[put("/drivers/me/availability")]
pub async fn set_availability(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DriverAvailabilityRequestBody>,
) -> ApiResult<web::Json<DriverPresenceResponse>> {
    let principal = session.require_principal()?;

    let presence = state
        .drivers
        .set_availability(SetAvailabilityRequest {
            principal,
            available: payload.available,
        })
        .await?;

    Ok(web::Json(DriverPresenceResponse::from(presence)))
}

#[cfg(test)]
#[path = "drivers_tests.rs"]
mod tests;
