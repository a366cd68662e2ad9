//! Driven port for the payroll verification provider.
//!
//! The relay forwards each call as-is and hands the provider's JSON back to
//! its caller, so successful responses stay untyped `serde_json::Value`s.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::define_port_error;
use crate::domain::{LinkId, ProviderUserId, PublicToken};

/// Fallback first name when the caller does not supply one.
pub const DEFAULT_FIRST_NAME: &str = "John";
/// Fallback last name when the caller does not supply one.
pub const DEFAULT_LAST_NAME: &str = "Doe";
/// Fallback contact email when the caller does not supply one.
pub const DEFAULT_EMAIL: &str = "borrower@example.com";

/// User record the provider should create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProviderUser {
    /// Caller-chosen identifier stored by the provider.
    pub external_user_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
}

impl NewProviderUser {
    /// Build a user record, filling absent or blank fields with the sandbox
    /// defaults.
    ///
    /// # Examples
    /// ```
    /// use fastpass::domain::ports::NewProviderUser;
    ///
    /// let user = NewProviderUser::with_defaults("borrower-jane-1", Some("Jane"), None, None);
    /// assert_eq!(user.first_name, "Jane");
    /// assert_eq!(user.last_name, "Doe");
    /// assert_eq!(user.email, "borrower@example.com");
    /// ```
    pub fn with_defaults(
        external_user_id: impl Into<String>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
    ) -> Self {
        fn or_default(value: Option<&str>, default: &str) -> String {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
                .to_owned()
        }

        Self {
            external_user_id: external_user_id.into(),
            first_name: or_default(first_name, DEFAULT_FIRST_NAME),
            last_name: or_default(last_name, DEFAULT_LAST_NAME),
            email: or_default(email, DEFAULT_EMAIL),
        }
    }
}

/// Product the bridge session verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// Employment verification.
    #[default]
    Employment,
    /// Income verification.
    Income,
}

define_port_error! {
    /// Errors surfaced while calling the verification provider.
    pub enum VerificationProviderError {
        /// The request never produced a response.
        Transport { message: String } =>
            "verification provider transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "verification provider timed out: {message}",
        /// The provider answered with a non-success status.
        Rejected { status: u16, body: Option<Value> } =>
            "verification provider rejected the request with status {status}",
        /// A success response did not contain JSON.
        Decode { message: String } =>
            "verification provider response decode failed: {message}",
    }
}

impl VerificationProviderError {
    /// Provider error body worth showing to developers, if any.
    pub fn provider_body(&self) -> Option<&Value> {
        match self {
            Self::Rejected { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Port covering the four provider calls the relay forwards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationProvider: Send + Sync {
    /// Create a provider user; the response carries its `id`.
    async fn create_user(&self, user: &NewProviderUser) -> Result<Value, VerificationProviderError>;

    /// Issue a bridge token for a provider user.
    async fn issue_bridge_token(
        &self,
        user_id: &ProviderUserId,
        product: ProductType,
    ) -> Result<Value, VerificationProviderError>;

    /// Exchange a bridge public token for an access token and link id.
    async fn exchange_public_token(
        &self,
        public_token: &PublicToken,
    ) -> Result<Value, VerificationProviderError>;

    /// Fetch the employment verification document for a link.
    async fn fetch_employment(&self, link_id: &LinkId) -> Result<Value, VerificationProviderError>;
}
