//! Tests for the dispatch service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    DispatchMetricsError, MockDispatchMetrics, MockRideRegistry, NoOpDispatchMetrics,
    RideRegistryError,
};
use crate::domain::test_support::{
    cancelled_ride, completed_ride, ongoing_ride, participant, principal_for, requested_ride,
    run_locked,
};
use crate::domain::{ErrorCode, Participant, RideId, RideStatus};

#[fixture]
fn rider() -> Participant {
    participant("Ada")
}

#[fixture]
fn driver() -> Participant {
    participant("Grace")
}

fn expect_outcome(outcome: AcceptOutcome) -> MockDispatchMetrics {
    let mut metrics = MockDispatchMetrics::new();
    metrics
        .expect_record_accept()
        .withf(move |recorded| *recorded == outcome)
        .times(1)
        .returning(|_| Ok(()));
    metrics
}

fn accept(driver: &Participant, ride_id: RideId) -> RideActionRequest {
    RideActionRequest {
        principal: principal_for(driver, &[Role::Driver]),
        ride_id,
    }
}

#[rstest]
#[tokio::test]
async fn accept_open_ride_assigns_driver(rider: Participant, driver: Participant) {
    let ride = requested_ride(&rider);
    let ride_id = ride.id();
    let mut registry = MockRideRegistry::new();
    registry
        .expect_get_for_update()
        .times(1)
        .returning(run_locked(ride));

    let service = DispatchService::new(
        Arc::new(registry),
        Arc::new(expect_outcome(AcceptOutcome::Won)),
    );
    let accepted = service
        .accept_ride(accept(&driver, ride_id))
        .await
        .expect("open ride accepted");

    assert_eq!(accepted.status(), RideStatus::Ongoing);
    assert_eq!(accepted.driver(), Some(&driver));
}

#[rstest]
#[case::taken(ongoing_ride(&participant("Ada"), &participant("Linus")))]
#[case::completed(completed_ride(&participant("Ada"), &participant("Linus")))]
#[case::cancelled(cancelled_ride(&participant("Ada")))]
#[tokio::test]
async fn accept_unavailable_ride_reports_ride_unavailable(
    #[case] ride: Ride,
    driver: Participant,
) {
    let ride_id = ride.id();
    let mut registry = MockRideRegistry::new();
    registry
        .expect_get_for_update()
        .times(1)
        .returning(run_locked(ride));

    let service = DispatchService::new(
        Arc::new(registry),
        Arc::new(expect_outcome(AcceptOutcome::Lost)),
    );
    let error = service
        .accept_ride(accept(&driver, ride_id))
        .await
        .expect_err("ride unavailable");

    assert_eq!(error.code(), ErrorCode::RideUnavailable);
    assert!(!error.is_retryable());
}

#[rstest]
#[tokio::test]
async fn accept_missing_ride_is_not_found(driver: Participant) {
    let mut registry = MockRideRegistry::new();
    registry
        .expect_get_for_update()
        .times(1)
        .returning(|_, _| Ok(LockedOutcome::Missing));

    let service = DispatchService::new(
        Arc::new(registry),
        Arc::new(expect_outcome(AcceptOutcome::Missing)),
    );
    let error = service
        .accept_ride(accept(&driver, RideId::random()))
        .await
        .expect_err("missing ride");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn accept_lock_timeout_is_retryable(driver: Participant) {
    let mut registry = MockRideRegistry::new();
    registry
        .expect_get_for_update()
        .times(1)
        .returning(|id, _| Err(RideRegistryError::lock_timeout(id.to_string())));

    let service = DispatchService::new(
        Arc::new(registry),
        Arc::new(expect_outcome(AcceptOutcome::Error)),
    );
    let error = service
        .accept_ride(accept(&driver, RideId::random()))
        .await
        .expect_err("lock wait exceeded");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert!(error.is_retryable());
}

#[rstest]
#[tokio::test]
async fn accept_requires_driver_role(rider: Participant) {
    let mut registry = MockRideRegistry::new();
    registry.expect_get_for_update().times(0);
    let mut metrics = MockDispatchMetrics::new();
    metrics.expect_record_accept().times(0);

    let service = DispatchService::new(Arc::new(registry), Arc::new(metrics));
    let error = service
        .accept_ride(RideActionRequest {
            principal: principal_for(&rider, &[Role::Rider]),
            ride_id: RideId::random(),
        })
        .await
        .expect_err("riders cannot accept");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn metrics_failure_does_not_fail_accept(rider: Participant, driver: Participant) {
    let ride = requested_ride(&rider);
    let ride_id = ride.id();
    let mut registry = MockRideRegistry::new();
    registry
        .expect_get_for_update()
        .times(1)
        .returning(run_locked(ride));
    let mut metrics = MockDispatchMetrics::new();
    metrics
        .expect_record_accept()
        .times(1)
        .returning(|_| Err(DispatchMetricsError::export("exporter offline")));

    let service = DispatchService::new(Arc::new(registry), Arc::new(metrics));
    let accepted = service
        .accept_ride(accept(&driver, ride_id))
        .await
        .expect("metrics are best effort");
    assert_eq!(accepted.status(), RideStatus::Ongoing);
}

#[rstest]
#[tokio::test]
async fn list_available_rides_passes_registry_order(rider: Participant, driver: Participant) {
    let first = requested_ride(&rider);
    let second = requested_ride(&participant("Bea"));
    let expected = vec![first.id(), second.id()];
    let mut registry = MockRideRegistry::new();
    registry
        .expect_list_available()
        .times(1)
        .return_once(move || Ok(vec![first, second]));

    let service = DispatchService::new(Arc::new(registry), Arc::new(NoOpDispatchMetrics));
    let rides = service
        .list_available_rides(principal_for(&driver, &[Role::Driver]))
        .await
        .expect("list succeeds");
    let ids: Vec<RideId> = rides.iter().map(Ride::id).collect();
    assert_eq!(ids, expected);
}

#[rstest]
#[tokio::test]
async fn list_available_rides_requires_driver_role(rider: Participant) {
    let mut registry = MockRideRegistry::new();
    registry.expect_list_available().times(0);

    let service = DispatchService::new(Arc::new(registry), Arc::new(NoOpDispatchMetrics));
    let error = service
        .list_available_rides(principal_for(&rider, &[Role::Rider]))
        .await
        .expect_err("riders cannot list the pool");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}
