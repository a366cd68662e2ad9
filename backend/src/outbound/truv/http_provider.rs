//! Reqwest-backed verification provider adapter.
//!
//! This adapter owns transport details only: URL construction, Basic auth,
//! timeout and status mapping. Response bodies are handed back as raw JSON.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use super::config::TruvSettings;
use super::dto::{BridgeTokenDto, CreateUserDto, PublicTokenDto};
use crate::domain::ports::{
    NewProviderUser, ProductType, VerificationProvider, VerificationProviderError,
};
use crate::domain::{LinkId, ProviderUserId, PublicToken};
use crate::outbound::http_body::{body_preview, error_body};

/// Provider adapter bound to one API root and one set of credentials.
pub struct TruvHttpProvider {
    client: Client,
    base_url: Url,
    client_id: String,
    secret: Zeroizing<String>,
}

impl TruvHttpProvider {
    /// Build an adapter using a reqwest client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: TruvSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            base_url: settings.base_url,
            client_id: settings.client_id,
            secret: settings.secret,
        })
    }

    /// API root requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url, VerificationProviderError> {
        provider_url(&self.base_url, segments)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.client_id, Some(self.secret.as_str()))
            .header(header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, VerificationProviderError> {
        let response = self
            .authorised(request)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|error| {
            VerificationProviderError::decode(format!(
                "invalid provider JSON ({error}): {}",
                body_preview(body.as_ref())
            ))
        })
    }
}

#[async_trait]
impl VerificationProvider for TruvHttpProvider {
    async fn create_user(&self, user: &NewProviderUser) -> Result<Value, VerificationProviderError> {
        let url = self.url(&["users", ""])?;
        debug!(%url, "creating provider user");
        self.send(self.client.post(url).json(&CreateUserDto::from(user)))
            .await
    }

    async fn issue_bridge_token(
        &self,
        user_id: &ProviderUserId,
        product: ProductType,
    ) -> Result<Value, VerificationProviderError> {
        let url = self.url(&["users", user_id.as_str(), "tokens", ""])?;
        debug!(%url, ?product, "issuing bridge token");
        self.send(self.client.post(url).json(&BridgeTokenDto::new(product)))
            .await
    }

    async fn exchange_public_token(
        &self,
        public_token: &PublicToken,
    ) -> Result<Value, VerificationProviderError> {
        let url = self.url(&["link-access-tokens", ""])?;
        debug!(%url, "exchanging public token");
        let body = PublicTokenDto {
            public_token: public_token.as_str(),
        };
        self.send(self.client.post(url).json(&body)).await
    }

    async fn fetch_employment(&self, link_id: &LinkId) -> Result<Value, VerificationProviderError> {
        let url = self.url(&["links", link_id.as_str(), "employment", "verification"])?;
        debug!(%url, "fetching employment verification");
        self.send(self.client.get(url)).await
    }
}

/// Append percent-encoded path segments to the API root. An empty final
/// segment yields the trailing slash the provider's collection routes use.
fn provider_url(base: &Url, segments: &[&str]) -> Result<Url, VerificationProviderError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| VerificationProviderError::transport(format!("unusable base URL {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> VerificationProviderError {
    if error.is_timeout() {
        VerificationProviderError::timeout(error.to_string())
    } else if error.is_decode() {
        VerificationProviderError::decode(error.to_string())
    } else {
        VerificationProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> VerificationProviderError {
    debug!(status = status.as_u16(), body = %body_preview(body), "provider rejected request");
    VerificationProviderError::rejected(status.as_u16(), error_body(body))
}
