//! Ride history HTTP handler.
//!
//! ```text
//! GET /api/v1/history/{role}?page=N
//! ```

use actix_web::{HttpRequest, get, web};
use pagination::PageLinks;

use crate::domain::ports::RideHistoryRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::rides_dto::{HistoryQuery, HistoryResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_role;

/// Finished rides where the caller acted in `role`, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/history/{role}",
    params(
        ("role" = String, Path, description = "rider or driver"),
        ("page" = Option<u32>, Query, description = "One-based page number")
    ),
    responses(
        (status = 200, description = "History page", body = HistoryResponse),
        (status = 400, description = "Invalid role or page", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Role not held", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "listRideHistory",
    security(("SessionCookie" = []))
)]
#[get("/history/{role}")]
pub async fn list_history(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    role: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> ApiResult<web::Json<HistoryResponse>> {
    let principal = session.require_principal()?;
    let role = parse_role(&role)?;
    let page = query.page.unwrap_or(1);

    let rides = state
        .history
        .list_history(RideHistoryRequest {
            principal,
            role,
            page,
        })
        .await?;
    let links = PageLinks::for_page(&req.full_url(), &rides);

    Ok(web::Json(HistoryResponse::new(rides, links)))
}
