//! Ride lifecycle and dispatch HTTP handlers.
//!
//! ```text
//! POST /api/v1/rides
//! GET  /api/v1/rides/available
//! GET  /api/v1/rides/{id}
//! POST /api/v1/rides/{id}/accept
//! POST /api/v1/rides/{id}/complete
//! POST /api/v1/rides/{id}/cancel
//! GET  /api/v1/rides/{id}/tracking
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::Role;
use crate::domain::ports::{CreateRideRequest, RideActionRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::rides_dto::{
    CreateRideRequestBody, RidePath, RideResponse, TrackingResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_location, parse_ride_id};

fn action_request(session: &SessionContext, path: RidePath) -> ApiResult<RideActionRequest> {
    let principal = session.require_principal()?;
    let ride_id = parse_ride_id(&path.id)?;
    Ok(RideActionRequest { principal, ride_id })
}

/// Request a ride as the authenticated rider.
#[utoipa::path(
    post,
    path = "/api/v1/rides",
    request_body = CreateRideRequestBody,
    responses(
        (status = 201, description = "Ride requested", body = RideResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Rider role required", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "createRide",
    security(("SessionCookie" = []))
)]
#[post("/rides")]
pub async fn create_ride(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRideRequestBody>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    principal.require_role(Role::Rider)?;
    let CreateRideRequestBody { pickup, dropoff } = payload.into_inner();
    let pickup = parse_location("pickup", &pickup.address, pickup.latitude, pickup.longitude)?;
    let dropoff = parse_location(
        "dropoff",
        &dropoff.address,
        dropoff.latitude,
        dropoff.longitude,
    )?;

    let ride = state
        .rides
        .create_ride(CreateRideRequest {
            principal,
            pickup,
            dropoff,
        })
        .await?;

    Ok(HttpResponse::Created().json(RideResponse::from(ride)))
}

/// List rides waiting for a driver, oldest request first.
#[utoipa::path(
    get,
    path = "/api/v1/rides/available",
    responses(
        (status = 200, description = "Open rides", body = [RideResponse]),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Driver role required", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["dispatch"],
    operation_id = "listAvailableRides",
    security(("SessionCookie" = []))
)]
#[get("/rides/available")]
pub async fn list_available_rides(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RideResponse>>> {
    let principal = session.require_principal()?;
    let rides = state.dispatch.list_available_rides(principal).await?;
    Ok(web::Json(rides.iter().map(RideResponse::from).collect()))
}

/// Fetch a ride the caller takes part in.
#[utoipa::path(
    get,
    path = "/api/v1/rides/{id}",
    params(("id" = String, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "Ride", body = RideResponse),
        (status = 400, description = "Invalid ride id", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Ride not found", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "getRide",
    security(("SessionCookie" = []))
)]
#[get("/rides/{id}")]
pub async fn get_ride(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RidePath>,
) -> ApiResult<web::Json<RideResponse>> {
    let request = action_request(&session, path.into_inner())?;
    let ride = state.ride_query.get_ride(request).await?;
    Ok(web::Json(RideResponse::from(ride)))
}

/// Take an open ride. Exactly one concurrent caller wins.
#[utoipa::path(
    post,
    path = "/api/v1/rides/{id}/accept",
    params(("id" = String, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "Ride accepted", body = RideResponse),
        (status = 400, description = "Invalid ride id", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Driver role required", body = ErrorSchema),
        (status = 404, description = "Ride not found", body = ErrorSchema),
        (status = 409, description = "Ride no longer available", body = ErrorSchema),
        (status = 503, description = "Lock wait timed out", body = ErrorSchema)
    ),
    tags = ["dispatch"],
    operation_id = "acceptRide",
    security(("SessionCookie" = []))
)]
#[post("/rides/{id}/accept")]
pub async fn accept_ride(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RidePath>,
) -> ApiResult<web::Json<RideResponse>> {
    let request = action_request(&session, path.into_inner())?;
    let ride = state.dispatch.accept_ride(request).await?;
    Ok(web::Json(RideResponse::from(ride)))
}

/// Complete an ongoing ride as its assigned driver.
#[utoipa::path(
    post,
    path = "/api/v1/rides/{id}/complete",
    params(("id" = String, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "Ride completed", body = RideResponse),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Not the assigned driver", body = ErrorSchema),
        (status = 404, description = "Ride not found", body = ErrorSchema),
        (status = 409, description = "Ride is not ongoing", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "completeRide",
    security(("SessionCookie" = []))
)]
#[post("/rides/{id}/complete")]
pub async fn complete_ride(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RidePath>,
) -> ApiResult<web::Json<RideResponse>> {
    let request = action_request(&session, path.into_inner())?;
    let ride = state.rides.complete_ride(request).await?;
    Ok(web::Json(RideResponse::from(ride)))
}

/// Cancel a ride that no driver has accepted yet.
#[utoipa::path(
    post,
    path = "/api/v1/rides/{id}/cancel",
    params(("id" = String, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "Ride cancelled", body = RideResponse),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Not the ride's rider", body = ErrorSchema),
        (status = 404, description = "Ride not found", body = ErrorSchema),
        (status = 409, description = "Ride is not requested", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "cancelRide",
    security(("SessionCookie" = []))
)]
#[post("/rides/{id}/cancel")]
pub async fn cancel_ride(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RidePath>,
) -> ApiResult<web::Json<RideResponse>> {
    let request = action_request(&session, path.into_inner())?;
    let ride = state.rides.cancel_ride(request).await?;
    Ok(web::Json(RideResponse::from(ride)))
}

/// Driver position for the rider of an ongoing ride.
#[utoipa::path(
    get,
    path = "/api/v1/rides/{id}/tracking",
    params(("id" = String, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "Driver position", body = TrackingResponse),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Not the ride's rider", body = ErrorSchema),
        (status = 404, description = "Ride not found", body = ErrorSchema),
        (status = 409, description = "Ride is not ongoing", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "trackRide",
    security(("SessionCookie" = []))
)]
#[get("/rides/{id}/tracking")]
pub async fn track_ride(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RidePath>,
) -> ApiResult<web::Json<TrackingResponse>> {
    let request = action_request(&session, path.into_inner())?;
    let tracking = state.tracking.track_ride(request).await?;
    Ok(web::Json(TrackingResponse::from(tracking)))
}

/// Register the ride routes. `available` precedes `{id}` so it is not read
/// as a ride id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_ride)
        .service(list_available_rides)
        .service(get_ride)
        .service(accept_ride)
        .service(complete_ride)
        .service(cancel_ride)
        .service(track_ride);
}

#[cfg(test)]
#[path = "rides_tests.rs"]
mod tests;
