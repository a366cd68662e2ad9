//! Capability port for the payment processor's checkout.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::wizard::WizardEvents;
use crate::domain::{OrderRequest, PaymentApproval, PaymentCapture};

define_port_error! {
    /// Errors raised by the checkout.
    pub enum PaymentCheckoutError {
        /// No checkout implementation is loaded.
        Unavailable => "payment checkout is not available",
        /// The configured API root cannot carry request paths.
        Endpoint { message: String } => "payment endpoint is unusable: {message}",
        /// The processor could not be reached.
        Transport { message: String } => "payment processor unreachable: {message}",
        /// The processor did not answer in time.
        Timeout { message: String } => "payment processor timed out: {message}",
        /// The processor answered with a non-success status.
        Rejected { status: u16, message: String } => "payment processor rejected the request ({status}): {message}",
        /// The processor's answer could not be decoded.
        Decode { message: String } => "payment processor response was invalid: {message}",
        /// The order could not be presented to the payer.
        Render { message: String } => "payment checkout failed to render: {message}",
    }
}

/// Payment buttons plus order capture.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentCheckout: Send + Sync {
    /// Present the order for approval. The payer's decision arrives later as
    /// a [`PaymentEvent`](crate::domain::wizard::PaymentEvent).
    async fn render(
        &self,
        order: &OrderRequest,
        events: WizardEvents,
    ) -> Result<(), PaymentCheckoutError>;

    /// Capture an approved order.
    async fn capture(
        &self,
        approval: &PaymentApproval,
    ) -> Result<PaymentCapture, PaymentCheckoutError>;
}
