//! Driving port for recording payment.

use async_trait::async_trait;

use crate::domain::{Error, PaymentMethod, Principal, Ride, RideId};

/// Request to record payment for a completed ride.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkPaidRequest {
    /// Acting principal.
    pub principal: Principal,
    /// Paid ride.
    pub ride_id: RideId,
    /// Asserted payment method.
    pub method: PaymentMethod,
}

/// Driving port for the payment gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    /// Record payment once. A repeat call fails `already_paid`.
    async fn mark_paid(&self, request: MarkPaidRequest) -> Result<Ride, Error>;
}
