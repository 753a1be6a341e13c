//! HTTP inbound adapter exposing REST endpoints.

pub mod drivers;
pub mod error;
pub mod feedback;
pub mod health;
pub mod history;
pub mod payments;
pub mod rides;
pub mod rides_dto;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every ride endpoint on the API scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    rides::configure(cfg);
    cfg.service(payments::mark_paid)
        .service(feedback::submit_feedback)
        .service(history::list_history)
        .service(drivers::update_location)
        .service(drivers::set_availability);
}
