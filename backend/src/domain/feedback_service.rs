//! Feedback service: one rating per participant per completed ride.
//!
//! Check order: rating range, ride existence, ride status, participation,
//! then the insert whose unique constraint decides duplicates.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    FeedbackCommand, FeedbackRepository, FeedbackRepositoryError, RideRegistry,
    SubmitFeedbackRequest,
};
use crate::domain::ride_service_support::load_ride;
use crate::domain::{Error, Feedback, FeedbackComment, Rating};

fn map_feedback_error(error: FeedbackRepositoryError) -> Error {
    match error {
        FeedbackRepositoryError::Duplicate { ride_id } => Error::duplicate_feedback(format!(
            "feedback for ride {ride_id} was already submitted"
        )),
        FeedbackRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("feedback repository unavailable: {message}"))
        }
        FeedbackRepositoryError::Query { message } => {
            Error::internal(format!("feedback repository error: {message}"))
        }
    }
}

/// Service implementing the feedback driving port.
#[derive(Clone)]
pub struct FeedbackService<R, F> {
    registry: Arc<R>,
    feedback_repo: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<R, F> FeedbackService<R, F> {
    /// Create a new feedback service.
    pub fn new(registry: Arc<R>, feedback_repo: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry,
            feedback_repo,
            clock,
        }
    }
}

#[async_trait]
impl<R, F> FeedbackCommand for FeedbackService<R, F>
where
    R: RideRegistry,
    F: FeedbackRepository,
{
    async fn submit_feedback(&self, request: SubmitFeedbackRequest) -> Result<Feedback, Error> {
        let rating = Rating::new(request.rating).map_err(|err| {
            Error::invalid_input(err.to_string()).with_details(json!({ "field": "rating" }))
        })?;
        let comment = FeedbackComment::parse(request.comment).map_err(|err| {
            Error::invalid_input(err.to_string()).with_details(json!({ "field": "comment" }))
        })?;

        let ride = load_ride(self.registry.as_ref(), request.ride_id).await?;
        let submitter = request.principal.user_id();
        let feedback = Feedback::for_ride(&ride, submitter, rating, comment, self.clock.utc())?;

        self.feedback_repo
            .insert(&feedback)
            .await
            .map_err(map_feedback_error)?;
        info!(
            ride_id = %feedback.ride_id(),
            submitted_by = %submitter,
            is_driver_feedback = feedback.is_driver_feedback(),
            "feedback recorded"
        );
        Ok(feedback)
    }
}

#[cfg(test)]
#[path = "feedback_service_tests.rs"]
mod tests;
