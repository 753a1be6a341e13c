//! Ride dispatch backend library.
//!
//! Layout follows ports and adapters: [`domain`] holds the ride aggregate,
//! its lifecycle rules and the services behind the driving ports;
//! [`outbound`] implements the driven ports over PostgreSQL, memory and
//! Prometheus; [`inbound`] exposes the driving ports over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
pub use settings::RideServiceSettings;
