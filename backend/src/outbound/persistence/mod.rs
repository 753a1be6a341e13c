//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool driven by
//! `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::time::Duration;
//!
//! use ride_dispatch::outbound::persistence::{DbPool, DieselRideRegistry, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/rides")).await?;
//! let registry = DieselRideRegistry::new(pool, Duration::from_secs(5));
//! # let _ = registry;
//! # Ok(())
//! # }
//! ```

mod diesel_driver_repository;
mod diesel_error_mapping;
mod diesel_feedback_repository;
mod diesel_ride_registry;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_driver_repository::DieselDriverRepository;
pub use diesel_feedback_repository::DieselFeedbackRepository;
pub use diesel_ride_registry::DieselRideRegistry;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
