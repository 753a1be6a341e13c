//! In-memory adapters for the driven ports.
//!
//! These adapters back the server when no database URL is configured and
//! drive the integration tests. They keep the same contracts as the
//! PostgreSQL adapters: a per-ride async lock with a bounded wait,
//! `updated_at` guarded writes and feedback uniqueness per submitter.
//!
//! State lives in the process and is lost on exit.

mod driver_repository;
mod feedback_repository;
mod ride_registry;

pub use driver_repository::InMemoryDriverRepository;
pub use feedback_repository::InMemoryFeedbackRepository;
pub use ride_registry::InMemoryRideRegistry;
