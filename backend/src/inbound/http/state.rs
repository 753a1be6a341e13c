//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    DispatchCommand, DispatchMetrics, DriverPresenceCommand, DriverRepository, FeedbackCommand,
    FeedbackRepository, PaymentCommand, RideCommand, RideHistoryQuery, RideQuery, RideRegistry,
    RideTrackingQuery,
};
use crate::domain::{
    DispatchService, DriverPresenceService, FeedbackService, PaymentService, RideHistoryService,
    RideLifecycleService, RideTrackingService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub rides: Arc<dyn RideCommand>,
    pub ride_query: Arc<dyn RideQuery>,
    pub dispatch: Arc<dyn DispatchCommand>,
    pub payments: Arc<dyn PaymentCommand>,
    pub feedback: Arc<dyn FeedbackCommand>,
    pub history: Arc<dyn RideHistoryQuery>,
    pub drivers: Arc<dyn DriverPresenceCommand>,
    pub tracking: Arc<dyn RideTrackingQuery>,
}

/// Driven adapters the domain services are composed from.
pub struct StateAdapters<R, F, D, M: ?Sized> {
    pub registry: Arc<R>,
    pub feedback: Arc<F>,
    pub drivers: Arc<D>,
    pub metrics: Arc<M>,
    pub clock: Arc<dyn Clock>,
    pub history_page_size: usize,
}

impl HttpState {
    /// Wire every domain service over one set of driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use mockable::DefaultClock;
    /// use ride_dispatch::domain::ports::NoOpDispatchMetrics;
    /// use ride_dispatch::inbound::http::state::{HttpState, StateAdapters};
    /// use ride_dispatch::outbound::memory::{
    ///     InMemoryDriverRepository, InMemoryFeedbackRepository, InMemoryRideRegistry,
    /// };
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let state = HttpState::from_adapters(StateAdapters {
    ///     registry: Arc::new(InMemoryRideRegistry::new(clock.clone(), Duration::from_secs(5))),
    ///     feedback: Arc::new(InMemoryFeedbackRepository::new()),
    ///     drivers: Arc::new(InMemoryDriverRepository::new(clock.clone())),
    ///     metrics: Arc::new(NoOpDispatchMetrics),
    ///     clock,
    ///     history_page_size: 10,
    /// });
    /// let _rides = state.rides.clone();
    /// ```
    pub fn from_adapters<R, F, D, M>(adapters: StateAdapters<R, F, D, M>) -> Self
    where
        R: RideRegistry + 'static,
        F: FeedbackRepository + 'static,
        D: DriverRepository + 'static,
        M: DispatchMetrics + ?Sized + 'static,
    {
        let StateAdapters {
            registry,
            feedback,
            drivers,
            metrics,
            clock,
            history_page_size,
        } = adapters;

        let lifecycle = Arc::new(RideLifecycleService::new(registry.clone()));
        Self {
            rides: lifecycle.clone(),
            ride_query: lifecycle,
            dispatch: Arc::new(DispatchService::new(registry.clone(), metrics)),
            payments: Arc::new(PaymentService::new(registry.clone())),
            feedback: Arc::new(FeedbackService::new(registry.clone(), feedback, clock)),
            history: Arc::new(RideHistoryService::new(registry.clone(), history_page_size)),
            drivers: Arc::new(DriverPresenceService::new(drivers.clone())),
            tracking: Arc::new(RideTrackingService::new(registry, drivers)),
        }
    }
}
