//! Payment HTTP handler.
//!
//! ```text
//! POST /api/v1/rides/{id}/payment
//! ```

use actix_web::{post, web};

use crate::domain::ports::MarkPaidRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::rides_dto::{MarkPaidRequestBody, RidePath, RideResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_payment_method, parse_ride_id};

/// Record payment for a completed ride. Paying twice is an error.
#[utoipa::path(
    post,
    path = "/api/v1/rides/{id}/payment",
    params(("id" = String, Path, description = "Ride identifier")),
    request_body = MarkPaidRequestBody,
    responses(
        (status = 200, description = "Payment recorded", body = RideResponse),
        (status = 400, description = "Invalid payment method", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Ride not found", body = ErrorSchema),
        (status = 409, description = "Ride not completed or already paid", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "markRidePaid",
    security(("SessionCookie" = []))
)]
#[post("/rides/{id}/payment")]
pub async fn mark_paid(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RidePath>,
    payload: web::Json<MarkPaidRequestBody>,
) -> ApiResult<web::Json<RideResponse>> {
    let principal = session.require_principal()?;
    let ride_id = parse_ride_id(&path.id)?;
    let method = parse_payment_method(&payload.method)?;

    let ride = state
        .payments
        .mark_paid(MarkPaidRequest {
            principal,
            ride_id,
            method,
        })
        .await?;

    Ok(web::Json(RideResponse::from(ride)))
}
