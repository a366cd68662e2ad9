//! Checkout values exchanged with the payment processor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Order the checkout should present for approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Decimal amount, e.g. `0.01`.
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Line shown to the payer.
    pub description: String,
}

/// Approval reported by the checkout once the payer confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentApproval {
    /// Processor order identifier to capture.
    pub order_id: String,
}

/// Capture result exactly as returned by the payment processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentCapture(Value);

impl PaymentCapture {
    /// Wrap a processor document.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the document.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Pretty-printed JSON for the receipt.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}
