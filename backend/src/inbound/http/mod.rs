//! HTTP inbound adapter: the verification relay and its health probes.

pub mod error;
pub mod health;
pub mod relay;
pub mod state;
pub mod validation;

pub use error::ApiResult;
