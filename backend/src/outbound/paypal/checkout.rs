//! Reqwest-backed PayPal checkout.
//!
//! Rendering creates an Orders v2 order and prints its approval link; the
//! payer's confirmation is read from the terminal and posted back to the
//! wizard. Capture happens only when the wizard asks for it.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url, header};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::runtime::Handle;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::dto::{CreateOrderDto, OrderResponseDto, TokenResponseDto};
use crate::domain::ports::{PaymentCheckout, PaymentCheckoutError};
use crate::domain::{
    OrderRequest, PaymentApproval, PaymentCapture, PaymentEvent, WizardEvents,
};
use crate::inbound::console::ConsolePrompt;
use crate::outbound::http_body::body_preview;

/// Sandbox REST root.
pub const DEFAULT_PAYPAL_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

const APPROVAL_PROMPT: &str = "Press Enter once the payment is approved (or type 'cancel'):";

/// Credentials and endpoint for the Orders v2 API.
pub struct PayPalSettings {
    /// REST app client id.
    pub client_id: String,
    /// REST app secret.
    pub secret: Zeroizing<String>,
    /// REST root, e.g. the sandbox host.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for PayPalSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayPalSettings")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Checkout adapter for PayPal's Orders v2 REST API.
pub struct PayPalCheckout {
    client: Client,
    settings: PayPalSettings,
    prompt: ConsolePrompt,
}

impl PayPalCheckout {
    /// Build a checkout that reads approvals from `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: PayPalSettings, prompt: ConsolePrompt) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            settings,
            prompt,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, PaymentCheckoutError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PaymentCheckoutError::endpoint(self.settings.base_url.as_str()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn access_token(&self) -> Result<Zeroizing<String>, PaymentCheckoutError> {
        let url = self.url(&["v1", "oauth2", "token"])?;
        let request = self
            .client
            .post(url)
            .basic_auth(&self.settings.client_id, Some(self.settings.secret.as_str()))
            .form(&[("grant_type", "client_credentials")]);
        let token: TokenResponseDto = send_json(request).await?;
        Ok(Zeroizing::new(token.access_token))
    }

    async fn create_order(
        &self,
        order: &OrderRequest,
    ) -> Result<OrderResponseDto, PaymentCheckoutError> {
        let token = self.access_token().await?;
        let url = self.url(&["v2", "checkout", "orders"])?;
        let request = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .json(&CreateOrderDto::from(order));
        send_json(request).await
    }

    async fn capture_order(&self, order_id: &str) -> Result<Value, PaymentCheckoutError> {
        let token = self.access_token().await?;
        let url = self.url(&["v2", "checkout", "orders", order_id, "capture"])?;
        let request = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .json(&json!({}));
        send_json(request).await
    }
}

async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, PaymentCheckoutError> {
    let response = request
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        debug!(
            status = status.as_u16(),
            body = %body_preview(&body),
            "payment processor rejected request"
        );
        return Err(PaymentCheckoutError::rejected(
            status.as_u16(),
            body_preview(&body),
        ));
    }
    serde_json::from_slice(&body).map_err(|error| {
        PaymentCheckoutError::decode(format!("{error}: {}", body_preview(&body)))
    })
}

fn map_transport_error(error: reqwest::Error) -> PaymentCheckoutError {
    if error.is_timeout() {
        PaymentCheckoutError::timeout(error.to_string())
    } else if error.is_decode() {
        PaymentCheckoutError::decode(error.to_string())
    } else {
        PaymentCheckoutError::transport(error.to_string())
    }
}

async fn read_approval(prompt: &ConsolePrompt, order_id: String) -> PaymentEvent {
    match prompt.ask(APPROVAL_PROMPT).await {
        Ok(Some(line)) if line.eq_ignore_ascii_case("cancel") => PaymentEvent::Error {
            message: "payment cancelled by payer".to_owned(),
        },
        Ok(Some(_)) => PaymentEvent::Approved(PaymentApproval { order_id }),
        Ok(None) => PaymentEvent::Error {
            message: "input closed before approval".to_owned(),
        },
        Err(error) => PaymentEvent::Error {
            message: error.to_string(),
        },
    }
}

#[async_trait]
impl PaymentCheckout for PayPalCheckout {
    async fn render(
        &self,
        order: &OrderRequest,
        events: WizardEvents,
    ) -> Result<(), PaymentCheckoutError> {
        let runtime = Handle::try_current().map_err(|_| PaymentCheckoutError::unavailable())?;
        let created = self.create_order(order).await?;
        let link = created
            .approval_link()
            .ok_or_else(|| PaymentCheckoutError::render("order has no approval link"))?;
        info!(order_id = %created.id, "payment order created");
        println!(
            "Pay {} {} to deliver the report. Approve at: {link}",
            order.amount, order.currency
        );

        let prompt = self.prompt.clone();
        let order_id = created.id;
        runtime.spawn(async move {
            let outcome = read_approval(&prompt, order_id).await;
            debug!(?outcome, "payment outcome read from terminal");
            events.payment(outcome);
        });
        Ok(())
    }

    async fn capture(
        &self,
        approval: &PaymentApproval,
    ) -> Result<PaymentCapture, PaymentCheckoutError> {
        let captured = self.capture_order(&approval.order_id).await?;
        Ok(PaymentCapture::new(captured))
    }
}
