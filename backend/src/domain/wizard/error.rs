//! Failures the wizard shows to the borrower.
//!
//! `Display` yields the message the view prints. The adapter error that
//! caused it, if any, is kept as the source for logs.

use thiserror::Error;

use crate::domain::ports::{BridgeWidgetError, PaymentCheckoutError, RelayApiError};

/// Borrower-facing wizard failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// The start form was submitted without a name.
    #[error("Please enter the borrower's name.")]
    EmptyBorrowerName,
    /// User creation or bridge token issuance failed.
    #[error("Failed to create user or bridge token.")]
    Connect(#[source] RelayApiError),
    /// The bridge widget could not be opened.
    #[error("Truv Bridge script not loaded")]
    BridgeUnavailable(#[source] BridgeWidgetError),
    /// The bridge widget reported an error.
    #[error("Failed to connect with payroll provider.")]
    BridgeFailed {
        /// Widget-provided description, logged only.
        message: String,
    },
    /// Token exchange or the verification fetch failed.
    #[error("Error retrieving employment data.")]
    Retrieval(#[source] RelayApiError),
    /// The verification document carried nothing worth charging for.
    #[error("No valid employment or income data found. Not charging.")]
    NoVerifiedData,
    /// The checkout reported an error.
    #[error("PayPal transaction failed.")]
    PaymentFailed {
        /// Checkout-provided description, logged only.
        message: String,
    },
    /// Capturing the approved order failed.
    #[error("Failed to process payment or deliver report.")]
    Capture(#[source] PaymentCheckoutError),
}

impl WizardError {
    /// Stable label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EmptyBorrowerName => "empty_borrower_name",
            Self::Connect(_) => "connect",
            Self::BridgeUnavailable(_) => "bridge_unavailable",
            Self::BridgeFailed { .. } => "bridge_failed",
            Self::Retrieval(_) => "retrieval",
            Self::NoVerifiedData => "no_verified_data",
            Self::PaymentFailed { .. } => "payment_failed",
            Self::Capture(_) => "capture",
        }
    }
}
