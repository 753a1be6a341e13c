//! Payment rule: a participant records payment once, after completion.

use serde_json::json;

use super::{PaymentMethod, PaymentStatus, Ride, RideStatus};
use crate::domain::{Error, UserId};

/// Why a payment was refused. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// Only the rider or the assigned driver may record payment.
    #[error("only ride participants may record payment")]
    Unauthorized,
    /// The ride has not been completed.
    #[error("cannot pay for a ride that is {current}; it must be COMPLETED")]
    InvalidState {
        /// Status the ride holds.
        current: RideStatus,
    },
    /// Payment was already recorded.
    #[error("ride has already been paid")]
    AlreadyPaid,
}

impl From<PaymentError> for Error {
    fn from(value: PaymentError) -> Self {
        match value {
            PaymentError::Unauthorized => Self::unauthorized(value.to_string()),
            PaymentError::InvalidState { current } => Self::invalid_state(value.to_string())
                .with_details(json!({
                    "currentStatus": current.as_str(),
                    "requiredStatus": RideStatus::Completed.as_str(),
                })),
            PaymentError::AlreadyPaid => Self::already_paid(value.to_string()).with_details(
                json!({ "currentPaymentStatus": PaymentStatus::Paid.as_str() }),
            ),
        }
    }
}

impl Ride {
    /// Record payment by `actor` using `method`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Unauthorized`] unless `actor` is the rider or
    /// the assigned driver,
    /// [`PaymentError::InvalidState`] unless the ride is COMPLETED, and
    /// [`PaymentError::AlreadyPaid`] when payment was already recorded.
    pub fn mark_paid(&self, actor: &UserId, method: PaymentMethod) -> Result<Self, PaymentError> {
        if !self.is_participant(actor) {
            return Err(PaymentError::Unauthorized);
        }
        if self.status != RideStatus::Completed {
            return Err(PaymentError::InvalidState {
                current: self.status,
            });
        }
        if self.payment_status == PaymentStatus::Paid {
            return Err(PaymentError::AlreadyPaid);
        }
        let mut next = self.clone();
        next.payment_status = PaymentStatus::Paid;
        next.payment_method = Some(method);
        Ok(next)
    }
}
