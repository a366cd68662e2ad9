//! FastPass verification relay and checkout wizard.
//!
//! The crate is split along the hexagon: [`domain`] owns the wizard state
//! machine and the ports it depends on, [`inbound`] holds the HTTP relay and
//! the terminal view, and [`outbound`] holds the reqwest adapters for the
//! verification provider, the relay itself, and the payment processor.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
pub use middleware::trace::TraceId;
