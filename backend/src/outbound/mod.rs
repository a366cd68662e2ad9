//! Outbound adapters implementing domain ports for external services.
//!
//! - **truv**: the verification provider, called by the relay
//! - **relay_client**: the relay itself, called by the wizard
//! - **paypal**: the payment processor's checkout
//! - **console_bridge**: a terminal stand-in for the provider's bridge widget
//!
//! Adapters translate between domain types and wire formats and contain no
//! flow logic.

pub mod console_bridge;
pub(crate) mod http_body;
pub mod paypal;
pub mod relay_client;
pub mod truv;
