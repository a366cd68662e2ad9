//! Truv verification provider adapter.

pub mod config;
mod dto;
pub mod fingerprint;
mod http_provider;

pub use config::{BuildMode, TruvConfigError, TruvSettings, truv_settings_from_env};
pub use http_provider::TruvHttpProvider;
