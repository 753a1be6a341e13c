//! Tests for driver presence HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    MockDispatchCommand, MockDriverPresenceCommand, MockFeedbackCommand, MockPaymentCommand,
    MockRideCommand, MockRideHistoryQuery, MockRideQuery, MockRideTrackingQuery,
};
use crate::domain::{Coordinates, DriverPresence, Error, Role, UserId};
use crate::inbound::http::error::json_config;
use crate::inbound::http::test_utils::{
    LOGIN_PATH, LoginBody, login_route, session_cookie, test_session_middleware,
};

const DRIVER: &str = "22222222-2222-4222-8222-222222222222";

fn state_with(drivers: MockDriverPresenceCommand) -> HttpState {
    HttpState {
        rides: Arc::new(MockRideCommand::new()),
        ride_query: Arc::new(MockRideQuery::new()),
        dispatch: Arc::new(MockDispatchCommand::new()),
        payments: Arc::new(MockPaymentCommand::new()),
        feedback: Arc::new(MockFeedbackCommand::new()),
        history: Arc::new(MockRideHistoryQuery::new()),
        drivers: Arc::new(drivers),
        tracking: Arc::new(MockRideTrackingQuery::new()),
    }
}

async fn call(drivers: MockDriverPresenceCommand, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(drivers)))
            .app_data(json_config())
            .wrap(test_session_middleware())
            .configure(login_route)
            .service(
                web::scope("/api/v1")
                    .service(update_location)
                    .service(set_availability),
            ),
    )
    .await;
    let login = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(LOGIN_PATH)
            .set_json(LoginBody::new(DRIVER, "Bo", &[Role::Driver]))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(uri)
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

fn presence(available: bool, location: Option<Coordinates>) -> DriverPresence {
    let id = UserId::new(DRIVER).expect("fixture id");
    DriverPresence::new(id, available, location, None)
}

#[rstest]
#[actix_web::test]
async fn location_update_passes_coordinates_through() {
    let mut drivers = MockDriverPresenceCommand::new();
    drivers
        .expect_update_location()
        .withf(|request| {
            request.latitude == 48.85
                && request.longitude == 2.35
                && request.principal.has_role(Role::Driver)
        })
        .times(1)
        .returning(|request| {
            let coordinates =
                Coordinates::new(request.latitude, request.longitude).expect("valid coordinates");
            Ok(presence(false, Some(coordinates)))
        });

    let (status, body) = call(
        drivers,
        "/api/v1/drivers/me/location",
        json!({"latitude": 48.85, "longitude": 2.35}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["driverId"], DRIVER);
    assert_eq!(body["latitude"], 48.85);
    assert_eq!(body["available"], false);
}

#[rstest]
#[actix_web::test]
async fn location_errors_map_to_bad_request() {
    let mut drivers = MockDriverPresenceCommand::new();
    drivers
        .expect_update_location()
        .returning(|_| Err(Error::invalid_input("latitude must be between -90 and 90")));

    let (status, body) = call(
        drivers,
        "/api/v1/drivers/me/location",
        json!({"latitude": 95.0, "longitude": 0.0}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
}

#[rstest]
#[case(true)]
#[case(false)]
#[actix_web::test]
async fn availability_is_stored(#[case] available: bool) {
    let mut drivers = MockDriverPresenceCommand::new();
    drivers
        .expect_set_availability()
        .withf(move |request| request.available == available)
        .times(1)
        .returning(|request| Ok(presence(request.available, None)));

    let (status, body) = call(
        drivers,
        "/api/v1/drivers/me/availability",
        json!({"available": available}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], available);
    assert!(body["latitude"].is_null());
}

#[rstest]
#[actix_web::test]
async fn missing_body_field_is_invalid_input() {
    let drivers = MockDriverPresenceCommand::new();

    let (status, body) = call(drivers, "/api/v1/drivers/me/availability", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
}
