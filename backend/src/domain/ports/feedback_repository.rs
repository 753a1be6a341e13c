//! Port for feedback persistence.

use async_trait::async_trait;

use crate::domain::Feedback;

use super::define_port_error;

define_port_error! {
    /// Errors raised by feedback repository adapters.
    pub enum FeedbackRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "feedback repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "feedback repository query failed: {message}",
        /// The submitter already left feedback for this ride.
        Duplicate { ride_id: String } =>
            "feedback already recorded for ride {ride_id}",
    }
}

/// Port for recording feedback.
///
/// Adapters enforce uniqueness of `(ride_id, submitted_by)` in storage and
/// report a violation as [`FeedbackRepositoryError::Duplicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Insert feedback.
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError>;
}
