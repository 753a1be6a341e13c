//! Driving port for post-ride feedback.

use async_trait::async_trait;

use crate::domain::{Error, Feedback, Principal, RideId};

/// Request to rate a completed ride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFeedbackRequest {
    /// Acting principal.
    pub principal: Principal,
    /// Rated ride.
    pub ride_id: RideId,
    /// Raw rating; validated before any other check.
    pub rating: i64,
    /// Optional comment.
    pub comment: Option<String>,
}

/// Driving port for the feedback gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackCommand: Send + Sync {
    /// Record feedback. A second submission by the same participant fails
    /// `duplicate_feedback`.
    async fn submit_feedback(&self, request: SubmitFeedbackRequest) -> Result<Feedback, Error>;
}
