//! Ride builders shared by domain and service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::ports::{LockedOutcome, RideMutation, RideRegistryError};
use super::{
    Coordinates, Location, Participant, PaymentMethod, Principal, Ride, RideId, Role, UserId,
};

pub(crate) fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock(seconds: i64) -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: at(seconds),
    })
}

pub(crate) fn participant(name: &str) -> Participant {
    Participant {
        id: UserId::random(),
        display_name: name.to_owned(),
    }
}

pub(crate) fn principal_for(participant: &Participant, roles: &[Role]) -> Principal {
    Principal::new(
        participant.id.clone(),
        participant.display_name.clone(),
        roles.iter().copied(),
    )
    .expect("valid principal")
}

pub(crate) fn location(field: &'static str, address: &str) -> Location {
    Location::new(
        field,
        address,
        Coordinates::new(51.5, -0.12).expect("valid coordinates"),
    )
    .expect("valid location")
}

pub(crate) fn requested_ride(rider: &Participant) -> Ride {
    Ride::request(
        RideId::random(),
        rider.clone(),
        location("pickup", "1 Main St"),
        location("dropoff", "9 Elm Rd"),
        at(0),
    )
}

pub(crate) fn ongoing_ride(rider: &Participant, driver: &Participant) -> Ride {
    requested_ride(rider)
        .accept(driver.clone())
        .expect("accept open ride")
        .touched(at(10))
}

pub(crate) fn completed_ride(rider: &Participant, driver: &Participant) -> Ride {
    ongoing_ride(rider, driver)
        .complete(&driver.id)
        .expect("complete ongoing ride")
        .touched(at(20))
}

pub(crate) fn cancelled_ride(rider: &Participant) -> Ride {
    requested_ride(rider)
        .cancel(&rider.id)
        .expect("cancel open ride")
        .touched(at(5))
}

pub(crate) fn paid_ride(rider: &Participant, driver: &Participant) -> Ride {
    completed_ride(rider, driver)
        .mark_paid(&rider.id, PaymentMethod::Card)
        .expect("pay completed ride")
        .touched(at(30))
}

/// Mock behaviour for `get_for_update` that runs the decision against `ride`.
pub(crate) fn run_locked(
    ride: Ride,
) -> impl FnMut(&RideId, RideMutation) -> Result<LockedOutcome, RideRegistryError> + Send + 'static
{
    move |_, mutation| {
        Ok(match mutation(&ride) {
            Ok(next) => LockedOutcome::Applied(next),
            Err(refusal) => LockedOutcome::Rejected(refusal),
        })
    }
}
