//! Reqwest client for the relay's HTTP surface.
//!
//! The wizard only needs a few identifiers out of each relay response; those
//! are picked out here so the domain never handles raw provider JSON except
//! for the verification document itself.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{CreateUserRequest, RelayApi, RelayApiError};
use crate::domain::{
    AccessToken, BridgeToken, LinkAccess, LinkId, ProviderUserId, PublicToken,
    VerificationPayload,
};
use crate::outbound::http_body::{body_preview, error_body};

/// Relay client bound to one relay origin.
pub struct RelayHttpClient {
    client: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct CreateUserDto<'a> {
    user_id: &'a str,
    first_name: &'a str,
}

#[derive(Serialize)]
struct BridgeTokenDto<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
struct ExchangeDto<'a> {
    public_token: &'a str,
}

impl RelayHttpClient {
    /// Build a client for the relay at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, RelayApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RelayApiError::transport(format!("unusable relay URL {}", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, RelayApiError> {
        let response = request
            .send()
            .await
            .map_err(|error| RelayApiError::transport(error.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| RelayApiError::transport(error.to_string()))?;
        if !status.is_success() {
            debug!(status = status.as_u16(), body = %body_preview(&body), "relay call failed");
            return Err(RelayApiError::rejected(status.as_u16(), error_body(&body)));
        }
        serde_json::from_slice(&body).map_err(|error| RelayApiError::decode(error.to_string()))
    }
}

fn required_str(document: &Value, field: &str) -> Result<String, RelayApiError> {
    document
        .get(field)
        .and_then(|value| match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
        .ok_or_else(|| RelayApiError::missing_field(field))
}

#[async_trait]
impl RelayApi for RelayHttpClient {
    async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<ProviderUserId, RelayApiError> {
        let url = self.url(&["truv-create-user"])?;
        let body = CreateUserDto {
            user_id: request.user_id.as_str(),
            first_name: &request.first_name,
        };
        let created = self.send(self.client.post(url).json(&body)).await?;
        required_str(&created, "id").map(ProviderUserId::new)
    }

    async fn issue_bridge_token(
        &self,
        user: &ProviderUserId,
    ) -> Result<BridgeToken, RelayApiError> {
        let url = self.url(&["truv-bridge-token"])?;
        let body = BridgeTokenDto {
            user_id: user.as_str(),
        };
        let issued = self.send(self.client.post(url).json(&body)).await?;
        required_str(&issued, "bridge_token").map(BridgeToken::new)
    }

    async fn exchange_public_token(
        &self,
        public_token: &PublicToken,
    ) -> Result<LinkAccess, RelayApiError> {
        let url = self.url(&["truv-exchange-public-token"])?;
        let body = ExchangeDto {
            public_token: public_token.as_str(),
        };
        let exchanged = self.send(self.client.post(url).json(&body)).await?;
        Ok(LinkAccess {
            access_token: AccessToken::new(required_str(&exchanged, "access_token")?),
            link_id: LinkId::new(required_str(&exchanged, "link_id")?),
        })
    }

    async fn fetch_employment(
        &self,
        link_id: &LinkId,
    ) -> Result<VerificationPayload, RelayApiError> {
        let url = self.url(&["truv-employment", link_id.as_str()])?;
        let document = self.send(self.client.get(url)).await?;
        Ok(VerificationPayload::new(document))
    }
}
