//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every ride endpoint, the health probes, the error
//! schema wrappers and the session cookie security scheme. Swagger UI serves
//! it in debug builds and `openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::rides_dto::{
    CreateRideRequestBody, DriverAvailabilityRequestBody, DriverLocationRequestBody,
    DriverPresenceResponse, FeedbackResponse, HistoryLinks, HistoryResponse, LocationBody,
    MarkPaidRequestBody, ParticipantBody, RideResponse, SubmitFeedbackRequestBody,
    TrackingResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Signed session cookie written by the identity provider.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ride dispatch API",
        description = "Ride requests, driver dispatch, payment, feedback and history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::rides::create_ride,
        crate::inbound::http::rides::list_available_rides,
        crate::inbound::http::rides::get_ride,
        crate::inbound::http::rides::accept_ride,
        crate::inbound::http::rides::complete_ride,
        crate::inbound::http::rides::cancel_ride,
        crate::inbound::http::rides::track_ride,
        crate::inbound::http::payments::mark_paid,
        crate::inbound::http::feedback::submit_feedback,
        crate::inbound::http::history::list_history,
        crate::inbound::http::drivers::update_location,
        crate::inbound::http::drivers::set_availability,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LocationBody,
        ParticipantBody,
        CreateRideRequestBody,
        RideResponse,
        MarkPaidRequestBody,
        SubmitFeedbackRequestBody,
        FeedbackResponse,
        TrackingResponse,
        DriverLocationRequestBody,
        DriverAvailabilityRequestBody,
        DriverPresenceResponse,
        HistoryLinks,
        HistoryResponse,
    )),
    tags(
        (name = "rides", description = "Ride requests and lifecycle"),
        (name = "dispatch", description = "Open ride pool and driver assignment"),
        (name = "payments", description = "Payment recording"),
        (name = "feedback", description = "Post-ride ratings"),
        (name = "history", description = "Finished rides"),
        (name = "drivers", description = "Driver position and availability"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
