//! Ride history service: finished rides per participant, newest first.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest};

use crate::domain::ports::{RideHistoryQuery, RideHistoryRequest, RideRegistry};
use crate::domain::ride_service_support::map_registry_error;
use crate::domain::{Error, Ride};

/// Service implementing the history driving port.
#[derive(Clone)]
pub struct RideHistoryService<R> {
    registry: Arc<R>,
    page_size: usize,
}

impl<R> RideHistoryService<R> {
    /// Create a history service returning `page_size` rides per page.
    pub fn new(registry: Arc<R>, page_size: usize) -> Self {
        Self {
            registry,
            page_size,
        }
    }

    /// Create a history service with [`DEFAULT_PAGE_SIZE`].
    pub fn with_default_page_size(registry: Arc<R>) -> Self {
        Self::new(registry, DEFAULT_PAGE_SIZE)
    }
}

#[async_trait]
impl<R> RideHistoryQuery for RideHistoryService<R>
where
    R: RideRegistry,
{
    async fn list_history(&self, request: RideHistoryRequest) -> Result<Page<Ride>, Error> {
        request.principal.require_role(request.role)?;
        let page = PageRequest::new(request.page, self.page_size)
            .map_err(|err| Error::invalid_input(err.to_string()))?;
        self.registry
            .list_history(request.principal.user_id(), request.role, page)
            .await
            .map_err(map_registry_error)
    }
}
