//! Feedback HTTP handler.
//!
//! ```text
//! POST /api/v1/rides/{id}/feedback
//! ```

use actix_web::{HttpResponse, post, web};

use crate::domain::ports::SubmitFeedbackRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::rides_dto::{FeedbackResponse, RidePath, SubmitFeedbackRequestBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_ride_id;

/// Rate a completed ride once per participant.
#[utoipa::path(
    post,
    path = "/api/v1/rides/{id}/feedback",
    params(("id" = String, Path, description = "Ride identifier")),
    request_body = SubmitFeedbackRequestBody,
    responses(
        (status = 201, description = "Feedback stored", body = FeedbackResponse),
        (status = 400, description = "Rating or comment invalid", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Ride not found", body = ErrorSchema),
        (status = 409, description = "Ride not completed or feedback already given", body = ErrorSchema)
    ),
    tags = ["feedback"],
    operation_id = "submitFeedback",
    security(("SessionCookie" = []))
)]
#[post("/rides/{id}/feedback")]
pub async fn submit_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RidePath>,
    payload: web::Json<SubmitFeedbackRequestBody>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let ride_id = parse_ride_id(&path.id)?;
    let SubmitFeedbackRequestBody { rating, comment } = payload.into_inner();

    let feedback = state
        .feedback
        .submit_feedback(SubmitFeedbackRequest {
            principal,
            ride_id,
            rating,
            comment,
        })
        .await?;

    Ok(HttpResponse::Created().json(FeedbackResponse::from(feedback)))
}
