//! Post-ride feedback: a 1-5 rating with an optional comment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use serde_json::json;

use super::{Error, Ride, RideId, RideStatus, UserId};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;
/// Maximum comment length in characters.
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Validation errors raised while building feedback values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackValidationError {
    /// Rating outside `MIN_RATING..=MAX_RATING`.
    #[error("rating must be between {MIN_RATING} and {MAX_RATING}, got {0}")]
    RatingOutOfRange(i64),
    /// Comment longer than [`MAX_COMMENT_LENGTH`].
    #[error("comment must be at most {MAX_COMMENT_LENGTH} characters")]
    CommentTooLong,
    /// Comment was present but blank where one is required.
    #[error("comment must not be blank")]
    BlankComment,
}

/// Integer rating in `1..=5`.
///
/// # Examples
/// ```
/// use ride_dispatch::domain::Rating;
///
/// assert_eq!(Rating::new(4).map(|r| r.value()), Ok(4));
/// assert!(Rating::new(0).is_err());
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw rating.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackValidationError::RatingOutOfRange`].
    pub fn new(raw: i64) -> Result<Self, FeedbackValidationError> {
        u8::try_from(raw)
            .ok()
            .filter(|value| (MIN_RATING..=MAX_RATING).contains(value))
            .map(Self)
            .ok_or(FeedbackValidationError::RatingOutOfRange(raw))
    }

    /// Rating value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = FeedbackValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Trimmed, non-blank feedback comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedbackComment(String);

impl FeedbackComment {
    /// Trim an optional comment, dropping blanks.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackValidationError::CommentTooLong`].
    ///
    /// # Examples
    /// ```
    /// use ride_dispatch::domain::FeedbackComment;
    ///
    /// let comment = FeedbackComment::parse(Some(" smooth ride ".to_owned())).expect("valid");
    /// assert_eq!(comment.as_ref().map(|c| c.as_str()), Some("smooth ride"));
    /// assert_eq!(FeedbackComment::parse(Some("  ".to_owned())), Ok(None));
    /// ```
    pub fn parse(raw: Option<String>) -> Result<Option<Self>, FeedbackValidationError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > MAX_COMMENT_LENGTH {
            return Err(FeedbackValidationError::CommentTooLong);
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// Comment text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for FeedbackComment {
    type Error = FeedbackValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(Some(value))?.ok_or(FeedbackValidationError::BlankComment)
    }
}

impl From<FeedbackComment> for String {
    fn from(value: FeedbackComment) -> Self {
        value.0
    }
}

/// Why feedback was refused for a ride. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackError {
    /// The ride has not been completed.
    #[error("feedback is only accepted for COMPLETED rides, ride is {current}")]
    InvalidState {
        /// Status the ride holds.
        current: RideStatus,
    },
    /// The submitter is neither the rider nor the assigned driver.
    #[error("only ride participants may leave feedback")]
    Unauthorized,
}

impl From<FeedbackError> for Error {
    fn from(value: FeedbackError) -> Self {
        match value {
            FeedbackError::Unauthorized => Self::unauthorized(value.to_string()),
            FeedbackError::InvalidState { current } => Self::invalid_state(value.to_string())
                .with_details(json!({
                    "currentStatus": current.as_str(),
                    "requiredStatus": RideStatus::Completed.as_str(),
                })),
        }
    }
}

/// Feedback left by one participant of a completed ride.
///
/// ## Invariants
/// - At most one feedback per `(ride_id, submitted_by)`; storage enforces it.
/// - `is_driver_feedback` is true exactly when the submitter was the
///   assigned driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    ride_id: RideId,
    submitted_by: UserId,
    rating: Rating,
    comment: Option<FeedbackComment>,
    is_driver_feedback: bool,
    submitted_at: DateTime<Utc>,
}

/// Input for [`Feedback::new`], used when rebuilding stored feedback.
#[derive(Debug, Clone)]
pub struct FeedbackDraft {
    /// Rated ride.
    pub ride_id: RideId,
    /// Submitting participant.
    pub submitted_by: UserId,
    /// Rating value.
    pub rating: Rating,
    /// Optional comment.
    pub comment: Option<FeedbackComment>,
    /// Whether the driver submitted it.
    pub is_driver_feedback: bool,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
}

impl Feedback {
    /// Rebuild feedback from stored parts.
    #[must_use]
    pub fn new(draft: FeedbackDraft) -> Self {
        Self {
            ride_id: draft.ride_id,
            submitted_by: draft.submitted_by,
            rating: draft.rating,
            comment: draft.comment,
            is_driver_feedback: draft.is_driver_feedback,
            submitted_at: draft.submitted_at,
        }
    }

    /// Build feedback for `ride` from `submitter`.
    ///
    /// The ride must be COMPLETED before participation is considered.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::InvalidState`] unless the ride is COMPLETED
    /// and [`FeedbackError::Unauthorized`] for non-participants.
    pub fn for_ride(
        ride: &Ride,
        submitter: &UserId,
        rating: Rating,
        comment: Option<FeedbackComment>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, FeedbackError> {
        if ride.status() != RideStatus::Completed {
            return Err(FeedbackError::InvalidState {
                current: ride.status(),
            });
        }
        if !ride.is_participant(submitter) {
            return Err(FeedbackError::Unauthorized);
        }
        Ok(Self::new(FeedbackDraft {
            ride_id: ride.id(),
            submitted_by: submitter.clone(),
            rating,
            comment,
            is_driver_feedback: ride.is_assigned_driver(submitter),
            submitted_at,
        }))
    }

    /// Rated ride.
    #[must_use]
    pub const fn ride_id(&self) -> RideId {
        self.ride_id
    }

    /// Submitting participant.
    #[must_use]
    pub const fn submitted_by(&self) -> &UserId {
        &self.submitted_by
    }

    /// Rating value.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Optional comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_ref().map(FeedbackComment::as_str)
    }

    /// Whether the assigned driver submitted this feedback.
    #[must_use]
    pub const fn is_driver_feedback(&self) -> bool {
        self.is_driver_feedback
    }

    /// Submission timestamp.
    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}
