//! Shared HTTP adapter state.
//!
//! Relay handlers receive this through `actix_web::web::Data`. It holds only
//! the provider port, so handlers stay stateless between calls and can be
//! tested against a mock.

use std::sync::Arc;

use crate::domain::ports::VerificationProvider;

/// Dependency bundle for relay handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Verification provider every relay route forwards to.
    pub provider: Arc<dyn VerificationProvider>,
}

impl HttpState {
    /// Bundle the provider port.
    pub fn new(provider: Arc<dyn VerificationProvider>) -> Self {
        Self { provider }
    }
}
