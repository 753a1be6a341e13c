//! Payment service: records an asserted payment on a completed ride.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::Ride;
use crate::domain::ports::{MarkPaidRequest, PaymentCommand, RideRegistry};
use crate::domain::ride_service_support::guarded_write;

/// Service implementing the payment driving port.
#[derive(Clone)]
pub struct PaymentService<R> {
    registry: Arc<R>,
}

impl<R> PaymentService<R> {
    /// Create a new payment service over the ride registry.
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl<R> PaymentCommand for PaymentService<R>
where
    R: RideRegistry,
{
    async fn mark_paid(&self, request: MarkPaidRequest) -> Result<Ride, Error> {
        let actor = request.principal.user_id();
        let method = request.method;
        let ride = guarded_write(self.registry.as_ref(), request.ride_id, |current| {
            current.mark_paid(actor, method).map_err(Error::from)
        })
        .await?;
        info!(ride_id = %ride.id(), %method, "ride paid");
        Ok(ride)
    }
}

#[cfg(test)]
mod tests {
    //! Payment gate ordering and the concurrent second-payment path.

    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockRideRegistry, RideRegistryError};
    use crate::domain::test_support::{
        completed_ride, ongoing_ride, paid_ride, participant, principal_for,
    };
    use crate::domain::{ErrorCode, PaymentMethod, PaymentStatus, Principal, RideId, Role};

    fn request(principal: Principal, ride_id: RideId, method: PaymentMethod) -> MarkPaidRequest {
        MarkPaidRequest {
            principal,
            ride_id,
            method,
        }
    }

    #[tokio::test]
    async fn completed_ride_is_marked_paid() {
        let rider = participant("Ada");
        let ride = completed_ride(&rider, &participant("Grace"));
        let ride_id = ride.id();
        let mut registry = MockRideRegistry::new();
        registry
            .expect_get()
            .times(1)
            .return_once(move |_| Ok(Some(ride)));
        registry
            .expect_update()
            .times(1)
            .returning(|next| Ok(next.clone()));

        let paid = PaymentService::new(Arc::new(registry))
            .mark_paid(request(
                principal_for(&rider, &[Role::Rider]),
                ride_id,
                PaymentMethod::Card,
            ))
            .await
            .expect("payment recorded");
        assert_eq!(paid.payment_status(), PaymentStatus::Paid);
        assert_eq!(paid.payment_method(), Some(PaymentMethod::Card));
    }

    #[rstest]
    #[case::stranger_before_state(false, ErrorCode::Unauthorized)]
    #[case::participant_on_ongoing(true, ErrorCode::InvalidState)]
    #[tokio::test]
    async fn gate_checks_participation_then_status(
        #[case] as_rider: bool,
        #[case] expected: ErrorCode,
    ) {
        let rider = participant("Ada");
        let ride = ongoing_ride(&rider, &participant("Grace"));
        let ride_id = ride.id();
        let actor = if as_rider { rider } else { participant("Eve") };
        let mut registry = MockRideRegistry::new();
        registry
            .expect_get()
            .times(1)
            .return_once(move |_| Ok(Some(ride)));
        registry.expect_update().times(0);

        let error = PaymentService::new(Arc::new(registry))
            .mark_paid(request(
                principal_for(&actor, &[Role::Rider]),
                ride_id,
                PaymentMethod::Cash,
            ))
            .await
            .expect_err("refused");
        assert_eq!(error.code(), expected);
    }

    #[tokio::test]
    async fn second_payment_is_already_paid() {
        let rider = participant("Ada");
        let ride = paid_ride(&rider, &participant("Grace"));
        let ride_id = ride.id();
        let mut registry = MockRideRegistry::new();
        registry
            .expect_get()
            .times(1)
            .return_once(move |_| Ok(Some(ride)));
        registry.expect_update().times(0);

        let error = PaymentService::new(Arc::new(registry))
            .mark_paid(request(
                principal_for(&rider, &[Role::Rider]),
                ride_id,
                PaymentMethod::Wallet,
            ))
            .await
            .expect_err("already paid");
        assert_eq!(error.code(), ErrorCode::AlreadyPaid);
    }

    #[tokio::test]
    async fn losing_a_payment_race_reports_already_paid() {
        let rider = participant("Ada");
        let driver = participant("Grace");
        let unpaid = completed_ride(&rider, &driver);
        let ride_id = unpaid.id();
        let settled = unpaid
            .mark_paid(&driver.id, PaymentMethod::Cash)
            .expect("driver records cash");
        let reads = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&reads);

        let mut registry = MockRideRegistry::new();
        registry.expect_get().times(2).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(Some(unpaid.clone()))
            } else {
                Ok(Some(settled.clone()))
            }
        });
        registry
            .expect_update()
            .times(1)
            .returning(|next| Err(RideRegistryError::conflict(next.id().to_string())));

        let error = PaymentService::new(Arc::new(registry))
            .mark_paid(request(
                principal_for(&rider, &[Role::Rider]),
                ride_id,
                PaymentMethod::Card,
            ))
            .await
            .expect_err("driver paid first");
        assert_eq!(error.code(), ErrorCode::AlreadyPaid);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }
}
