//! Foodi backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds the aggregates,
//! services, and ports; `inbound` and `outbound` hold the HTTP and storage
//! adapters; `server` wires an explicitly constructed application context.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-trace middleware re-exported for application wiring.
pub use middleware::trace::Trace;
