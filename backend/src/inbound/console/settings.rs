//! Wizard settings loaded via OrthoConfig.
//!
//! Every field can come from `--kebab-case` flags or `FASTPASS_*`
//! environment variables; flags win.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use url::Url;
use zeroize::Zeroizing;

use crate::domain::OrderRequest;
use crate::outbound::paypal::{DEFAULT_PAYPAL_BASE_URL, PayPalSettings};

const DEFAULT_RELAY_URL: &str = "http://localhost:5000";
const DEFAULT_FEE: &str = "0.01";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const ORDER_DESCRIPTION: &str = "Employment verification report";

/// Settings for the interactive wizard.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FASTPASS")]
pub struct WizardSettings {
    /// Base URL of the verification relay.
    pub relay_url: Option<String>,
    /// Payment processor client id.
    pub paypal_client_id: Option<String>,
    /// Payment processor secret.
    pub paypal_secret: Option<String>,
    /// Payment processor API base URL.
    pub paypal_base_url: Option<String>,
    /// Fee charged per report. Environment values such as `2.50` arrive as
    /// numbers and are kept in decimal form.
    #[serde(default, deserialize_with = "fee_from_text_or_number")]
    pub fee: Option<String>,
    /// ISO currency code for the fee.
    pub currency: Option<String>,
    /// Outbound request timeout in seconds.
    #[ortho_config(default = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeeValue {
    Text(String),
    Whole(u64),
    Decimal(f64),
}

fn fee_from_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<FeeValue>::deserialize(deserializer)?.map(|value| match value {
            FeeValue::Text(text) => text,
            FeeValue::Whole(whole) => whole.to_string(),
            FeeValue::Decimal(decimal) => decimal.to_string(),
        }),
    )
}

/// Errors raised while resolving wizard settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardConfigError {
    #[error("{name} must be an absolute http(s) URL, got '{value}'")]
    InvalidUrl { name: &'static str, value: String },
    #[error("fee must be a positive decimal amount, got '{value}'")]
    InvalidFee { value: String },
}

impl WizardSettings {
    /// Relay base URL, defaulting to a local relay on port 5000.
    pub fn relay_url(&self) -> Result<Url, WizardConfigError> {
        parse_http_url("relay_url", self.relay_url.as_deref().unwrap_or(DEFAULT_RELAY_URL))
    }

    /// Request timeout shared by the relay client and the checkout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Payment processor settings. Missing credentials resolve to empty
    /// strings, which the sandbox rejects when the order is created.
    pub fn paypal_settings(&self) -> Result<PayPalSettings, WizardConfigError> {
        let base_url = parse_http_url(
            "paypal_base_url",
            self.paypal_base_url
                .as_deref()
                .unwrap_or(DEFAULT_PAYPAL_BASE_URL),
        )?;
        Ok(PayPalSettings {
            client_id: self.paypal_client_id.clone().unwrap_or_default(),
            secret: Zeroizing::new(self.paypal_secret.clone().unwrap_or_default()),
            base_url,
            timeout: self.timeout(),
        })
    }

    /// The order placed once a report is verified. The fee is written with
    /// two fraction digits.
    pub fn order(&self) -> Result<OrderRequest, WizardConfigError> {
        let fee = self.fee.as_deref().unwrap_or(DEFAULT_FEE).trim();
        let amount = two_digit_amount(fee).ok_or_else(|| WizardConfigError::InvalidFee {
            value: fee.to_owned(),
        })?;
        Ok(OrderRequest {
            amount,
            currency: self
                .currency
                .as_deref()
                .unwrap_or(DEFAULT_CURRENCY)
                .to_ascii_uppercase(),
            description: ORDER_DESCRIPTION.to_owned(),
        })
    }
}

fn parse_http_url(name: &'static str, value: &str) -> Result<Url, WizardConfigError> {
    let invalid = || WizardConfigError::InvalidUrl {
        name,
        value: value.to_owned(),
    };
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

/// Accepts positive amounts with at most two fraction digits. A `.` must be
/// followed by at least one digit.
fn two_digit_amount(amount: &str) -> Option<String> {
    let (whole, fraction) = match amount.split_once('.') {
        Some((_, "")) => return None,
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    let positive = amount.chars().any(|c| c.is_ascii_digit() && c != '0');
    if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) || fraction.len() > 2 {
        return None;
    }
    positive.then(|| format!("{whole}.{fraction:0<2}"))
}
