//! In-memory feedback store keyed by ride and submitter.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{FeedbackRepository, FeedbackRepositoryError};
use crate::domain::{Feedback, RideId, UserId};

fn poison_err<T>(_: PoisonError<T>) -> FeedbackRepositoryError {
    FeedbackRepositoryError::query("feedback store lock poisoned")
}

/// Feedback repository holding submissions in process memory.
#[derive(Debug, Default)]
pub struct InMemoryFeedbackRepository {
    entries: RwLock<HashMap<(RideId, UserId), Feedback>>,
}

impl InMemoryFeedbackRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feedback recorded for `ride_id`, oldest submission first.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackRepositoryError::Query`] when the lock is poisoned.
    pub fn for_ride(&self, ride_id: RideId) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        let entries = self.entries.read().map_err(poison_err)?;
        let mut found: Vec<Feedback> = entries
            .values()
            .filter(|feedback| feedback.ride_id() == ride_id)
            .cloned()
            .collect();
        found.sort_by_key(Feedback::submitted_at);
        Ok(found)
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError> {
        let mut entries = self.entries.write().map_err(poison_err)?;
        let key = (feedback.ride_id(), feedback.submitted_by().clone());
        if entries.contains_key(&key) {
            return Err(FeedbackRepositoryError::duplicate(
                feedback.ride_id().to_string(),
            ));
        }
        entries.insert(key, feedback.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::test_support::{at, participant};
    use crate::domain::{FeedbackDraft, Rating};

    fn feedback(ride_id: RideId, submitted_by: &UserId, is_driver_feedback: bool) -> Feedback {
        Feedback::new(FeedbackDraft {
            ride_id,
            submitted_by: submitted_by.clone(),
            rating: Rating::new(4).expect("valid rating"),
            comment: None,
            is_driver_feedback,
            submitted_at: at(40),
        })
    }

    #[rstest]
    #[tokio::test]
    async fn rider_and_driver_may_both_submit() {
        let repo = InMemoryFeedbackRepository::new();
        let ride_id = RideId::random();
        let rider = participant("Ada");
        let driver = participant("Grace");

        repo.insert(&feedback(ride_id, &rider.id, false))
            .await
            .expect("rider feedback");
        repo.insert(&feedback(ride_id, &driver.id, true))
            .await
            .expect("driver feedback");

        assert_eq!(repo.for_ride(ride_id).expect("read").len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn second_submission_is_a_duplicate() {
        let repo = InMemoryFeedbackRepository::new();
        let ride_id = RideId::random();
        let rider = participant("Ada");

        repo.insert(&feedback(ride_id, &rider.id, false))
            .await
            .expect("first feedback");
        let error = repo
            .insert(&feedback(ride_id, &rider.id, false))
            .await
            .expect_err("duplicate");

        assert_eq!(
            error,
            FeedbackRepositoryError::duplicate(ride_id.to_string())
        );
        assert_eq!(repo.for_ride(ride_id).expect("read").len(), 1);
    }
}
