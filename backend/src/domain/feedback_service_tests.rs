//! Tests for the feedback service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockFeedbackRepository, MockRideRegistry};
use crate::domain::test_support::{
    completed_ride, fixture_clock, ongoing_ride, participant, principal_for,
};
use crate::domain::{ErrorCode, Participant, Principal, Ride, RideId, Role};

type Service = FeedbackService<MockRideRegistry, MockFeedbackRepository>;

fn service(registry: MockRideRegistry, feedback_repo: MockFeedbackRepository) -> Service {
    FeedbackService::new(Arc::new(registry), Arc::new(feedback_repo), fixture_clock(50))
}

fn registry_with(ride: Ride) -> MockRideRegistry {
    let mut registry = MockRideRegistry::new();
    registry
        .expect_get()
        .times(1)
        .return_once(move |_| Ok(Some(ride)));
    registry
}

fn submit(principal: Principal, ride_id: RideId, rating: i64) -> SubmitFeedbackRequest {
    SubmitFeedbackRequest {
        principal,
        ride_id,
        rating,
        comment: None,
    }
}

fn pair() -> (Participant, Participant) {
    (participant("Ada"), participant("Grace"))
}

#[rstest]
#[case(0)]
#[case(6)]
#[tokio::test]
async fn out_of_range_rating_fails_before_lookup(#[case] rating: i64) {
    let mut registry = MockRideRegistry::new();
    registry.expect_get().times(0);
    let mut feedback_repo = MockFeedbackRepository::new();
    feedback_repo.expect_insert().times(0);

    let (rider, _) = pair();
    let error = service(registry, feedback_repo)
        .submit_feedback(submit(
            principal_for(&rider, &[Role::Rider]),
            RideId::random(),
            rating,
        ))
        .await
        .expect_err("rating out of range");
    assert_eq!(error.code(), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn rider_feedback_is_recorded() {
    let (rider, driver) = pair();
    let ride = completed_ride(&rider, &driver);
    let ride_id = ride.id();
    let rider_id = rider.id.clone();
    let mut feedback_repo = MockFeedbackRepository::new();
    feedback_repo
        .expect_insert()
        .withf(move |feedback| {
            feedback.submitted_by() == &rider_id
                && !feedback.is_driver_feedback()
                && feedback.rating().value() == 5
        })
        .times(1)
        .returning(|_| Ok(()));

    let mut request = submit(principal_for(&rider, &[Role::Rider]), ride_id, 5);
    request.comment = Some(" lovely ".to_owned());
    let feedback = service(registry_with(ride), feedback_repo)
        .submit_feedback(request)
        .await
        .expect("feedback accepted");
    assert_eq!(feedback.comment(), Some("lovely"));
    assert_eq!(feedback.submitted_at(), crate::domain::test_support::at(50));
}

#[tokio::test]
async fn driver_feedback_is_flagged() {
    let (rider, driver) = pair();
    let ride = completed_ride(&rider, &driver);
    let ride_id = ride.id();
    let mut feedback_repo = MockFeedbackRepository::new();
    feedback_repo
        .expect_insert()
        .withf(|feedback| feedback.is_driver_feedback())
        .times(1)
        .returning(|_| Ok(()));

    let feedback = service(registry_with(ride), feedback_repo)
        .submit_feedback(submit(principal_for(&driver, &[Role::Driver]), ride_id, 4))
        .await
        .expect("feedback accepted");
    assert!(feedback.is_driver_feedback());
}

#[tokio::test]
async fn stranger_on_ongoing_ride_sees_invalid_state_first() {
    let (rider, driver) = pair();
    let ride = ongoing_ride(&rider, &driver);
    let ride_id = ride.id();
    let mut feedback_repo = MockFeedbackRepository::new();
    feedback_repo.expect_insert().times(0);

    let stranger = participant("Eve");
    let error = service(registry_with(ride), feedback_repo)
        .submit_feedback(submit(principal_for(&stranger, &[Role::Rider]), ride_id, 5))
        .await
        .expect_err("not completed");
    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn stranger_on_completed_ride_is_unauthorized() {
    let (rider, driver) = pair();
    let ride = completed_ride(&rider, &driver);
    let ride_id = ride.id();
    let mut feedback_repo = MockFeedbackRepository::new();
    feedback_repo.expect_insert().times(0);

    let stranger = participant("Eve");
    let error = service(registry_with(ride), feedback_repo)
        .submit_feedback(submit(principal_for(&stranger, &[Role::Rider]), ride_id, 3))
        .await
        .expect_err("stranger");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert!(error.details().is_none());
}

#[tokio::test]
async fn feedback_on_ongoing_ride_is_invalid_state() {
    let (rider, driver) = pair();
    let ride = ongoing_ride(&rider, &driver);
    let ride_id = ride.id();
    let mut feedback_repo = MockFeedbackRepository::new();
    feedback_repo.expect_insert().times(0);

    let error = service(registry_with(ride), feedback_repo)
        .submit_feedback(submit(principal_for(&rider, &[Role::Rider]), ride_id, 3))
        .await
        .expect_err("not completed");
    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn duplicate_insert_maps_to_duplicate_feedback() {
    let (rider, driver) = pair();
    let ride = completed_ride(&rider, &driver);
    let ride_id = ride.id();
    let mut feedback_repo = MockFeedbackRepository::new();
    feedback_repo
        .expect_insert()
        .times(1)
        .returning(|feedback| {
            Err(FeedbackRepositoryError::duplicate(
                feedback.ride_id().to_string(),
            ))
        });

    let error = service(registry_with(ride), feedback_repo)
        .submit_feedback(submit(principal_for(&rider, &[Role::Rider]), ride_id, 2))
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::DuplicateFeedback);
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn missing_ride_is_not_found() {
    let mut registry = MockRideRegistry::new();
    registry.expect_get().times(1).returning(|_| Ok(None));
    let mut feedback_repo = MockFeedbackRepository::new();
    feedback_repo.expect_insert().times(0);

    let (rider, _) = pair();
    let error = service(registry, feedback_repo)
        .submit_feedback(submit(
            principal_for(&rider, &[Role::Rider]),
            RideId::random(),
            5,
        ))
        .await
        .expect_err("missing ride");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
