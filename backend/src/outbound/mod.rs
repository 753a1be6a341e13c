//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed registry and repositories using Diesel
//! - **memory**: in-process adapters for development mode and tests
//! - **metrics**: Prometheus-backed metrics exporters (feature-gated)
//!
//! Adapters translate between domain types and storage representations. They
//! contain no business rules.

pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
