//! PayPal Orders v2 checkout adapter.

mod checkout;
mod dto;

pub use checkout::{DEFAULT_PAYPAL_BASE_URL, PayPalCheckout, PayPalSettings};
