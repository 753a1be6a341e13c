//! Driving port for ride history.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, Principal, Ride, Role};

/// Request for one page of a participant's finished rides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideHistoryRequest {
    /// Acting principal.
    pub principal: Principal,
    /// Role whose rides are listed; the principal must hold it.
    pub role: Role,
    /// One-based page number.
    pub page: u32,
}

/// Driving port for history reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideHistoryQuery: Send + Sync {
    /// COMPLETED and CANCELLED rides, newest request first.
    async fn list_history(&self, request: RideHistoryRequest) -> Result<Page<Ride>, Error>;
}
