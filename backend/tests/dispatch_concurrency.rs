//! Concurrency tests for ride acceptance against the in-memory registry.
//!
//! Many drivers race for one open ride; exactly one wins and the rest are
//! told the ride is unavailable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mockable::DefaultClock;
use ride_dispatch::domain::ports::{
    AcceptOutcome, CreateRideRequest, DispatchCommand, DispatchMetrics, DispatchMetricsError,
    RideActionRequest, RideCommand, RideQuery,
};
use ride_dispatch::domain::{
    Coordinates, DispatchService, ErrorCode, Location, Principal, Ride, RideLifecycleService,
    RideStatus, Role, UserId,
};
use ride_dispatch::outbound::memory::InMemoryRideRegistry;
use rstest::{fixture, rstest};

#[derive(Default)]
struct CountingMetrics {
    counts: Mutex<HashMap<AcceptOutcome, usize>>,
}

impl CountingMetrics {
    fn count(&self, outcome: AcceptOutcome) -> usize {
        self.counts
            .lock()
            .expect("metrics lock")
            .get(&outcome)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DispatchMetrics for CountingMetrics {
    async fn record_accept(&self, outcome: AcceptOutcome) -> Result<(), DispatchMetricsError> {
        *self
            .counts
            .lock()
            .expect("metrics lock")
            .entry(outcome)
            .or_default() += 1;
        Ok(())
    }
}

struct Harness {
    lifecycle: Arc<RideLifecycleService<InMemoryRideRegistry>>,
    dispatch: Arc<DispatchService<InMemoryRideRegistry, CountingMetrics>>,
    metrics: Arc<CountingMetrics>,
}

#[fixture]
fn harness() -> Harness {
    let registry = Arc::new(InMemoryRideRegistry::new(
        Arc::new(DefaultClock),
        Duration::from_secs(5),
    ));
    let metrics = Arc::new(CountingMetrics::default());
    Harness {
        lifecycle: Arc::new(RideLifecycleService::new(registry.clone())),
        dispatch: Arc::new(DispatchService::new(registry, metrics.clone())),
        metrics,
    }
}

fn principal(name: &str, role: Role) -> Principal {
    Principal::new(UserId::random(), name, [role]).expect("valid principal")
}

fn location(field: &'static str, address: &str) -> Location {
    let coordinates = Coordinates::new(40.7, -74.0).expect("valid coordinates");
    Location::new(field, address, coordinates).expect("valid location")
}

async fn open_ride(harness: &Harness, rider: &Principal) -> Ride {
    harness
        .lifecycle
        .create_ride(CreateRideRequest {
            principal: rider.clone(),
            pickup: location("pickup", "5th Ave"),
            dropoff: location("dropoff", "Broadway"),
        })
        .await
        .expect("ride created")
}

#[rstest]
#[case(2)]
#[case(16)]
#[case(64)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn exactly_one_driver_wins_a_contested_ride(harness: Harness, #[case] drivers: usize) {
    let rider = principal("Rider", Role::Rider);
    let ride_id = open_ride(&harness, &rider).await.id();

    let contenders: Vec<Principal> = (0..drivers)
        .map(|n| principal(&format!("Driver {n}"), Role::Driver))
        .collect();
    let attempts = contenders.iter().cloned().map(|driver| {
        let dispatch = harness.dispatch.clone();
        tokio::spawn(async move {
            dispatch
                .accept_ride(RideActionRequest {
                    principal: driver,
                    ride_id,
                })
                .await
        })
    });
    let results = futures::future::join_all(attempts).await;

    let mut winners = Vec::new();
    for result in results {
        match result.expect("task completes") {
            Ok(accepted) => winners.push(accepted),
            Err(error) => assert_eq!(error.code(), ErrorCode::RideUnavailable),
        }
    }
    assert_eq!(winners.len(), 1, "exactly one accept must succeed");

    let winner = winners.first().and_then(Ride::driver).expect("winner assigned");
    assert!(contenders.iter().any(|c| c.user_id() == &winner.id));

    let stored = harness
        .lifecycle
        .get_ride(RideActionRequest {
            principal: rider,
            ride_id,
        })
        .await
        .expect("rider reads ride");
    assert_eq!(stored.status(), RideStatus::Ongoing);
    assert_eq!(stored.driver().map(|d| &d.id), Some(&winner.id));

    assert_eq!(harness.metrics.count(AcceptOutcome::Won), 1);
    assert_eq!(harness.metrics.count(AcceptOutcome::Lost), drivers - 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancel_and_accept_race_leaves_one_outcome(harness: Harness) {
    for _ in 0..32 {
        let rider = principal("Rider", Role::Rider);
        let driver = principal("Driver", Role::Driver);
        let ride = open_ride(&harness, &rider).await;

        let dispatch = harness.dispatch.clone();
        let lifecycle = harness.lifecycle.clone();
        let accept_request = RideActionRequest {
            principal: driver,
            ride_id: ride.id(),
        };
        let cancel_request = RideActionRequest {
            principal: rider,
            ride_id: ride.id(),
        };
        let (accepted, cancelled) = tokio::join!(
            tokio::spawn(async move { dispatch.accept_ride(accept_request).await }),
            tokio::spawn(async move { lifecycle.cancel_ride(cancel_request).await }),
        );
        let accepted = accepted.expect("accept task");
        let cancelled = cancelled.expect("cancel task");

        match (&accepted, &cancelled) {
            (Ok(ride), Err(error)) => {
                assert_eq!(ride.status(), RideStatus::Ongoing);
                assert_eq!(error.code(), ErrorCode::InvalidState);
            }
            (Err(error), Ok(ride)) => {
                assert_eq!(ride.status(), RideStatus::Cancelled);
                assert_eq!(error.code(), ErrorCode::RideUnavailable);
            }
            other => panic!("expected exactly one winner, got {other:?}"),
        }
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn accepts_on_different_rides_do_not_block_each_other(harness: Harness) {
    let rider = principal("Rider", Role::Rider);
    let mut rides = Vec::new();
    for _ in 0..8 {
        rides.push(open_ride(&harness, &rider).await);
    }

    let attempts = rides.iter().map(|ride| {
        let dispatch = harness.dispatch.clone();
        let request = RideActionRequest {
            principal: principal("Driver", Role::Driver),
            ride_id: ride.id(),
        };
        tokio::spawn(async move { dispatch.accept_ride(request).await })
    });
    let results = tokio::time::timeout(
        Duration::from_secs(5),
        futures::future::join_all(attempts),
    )
    .await
    .expect("independent accepts finish promptly");

    for result in results {
        let ride = result.expect("task completes").expect("each ride accepted");
        assert_eq!(ride.status(), RideStatus::Ongoing);
    }
    assert_eq!(harness.metrics.count(AcceptOutcome::Won), 8);
}
