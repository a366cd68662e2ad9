//! Driven port the wizard uses to reach the relay service.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{
    BridgeToken, ExternalUserId, LinkAccess, LinkId, ProviderUserId, PublicToken,
    VerificationPayload,
};

/// Body of the create-user call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    /// Synthesized external identifier.
    pub user_id: ExternalUserId,
    /// Borrower name as entered.
    pub first_name: String,
}

define_port_error! {
    /// Errors surfaced while calling the relay.
    pub enum RelayApiError {
        /// The relay could not be reached.
        Transport { message: String } =>
            "relay transport failed: {message}",
        /// The relay answered with a failure status.
        Rejected { status: u16, body: Option<Value> } =>
            "relay answered with status {status}",
        /// The relay answered with something other than JSON.
        Decode { message: String } =>
            "relay response decode failed: {message}",
        /// A success response lacked the identifier the next step needs.
        MissingField { field: String } =>
            "relay response is missing `{field}`",
    }
}

/// Relay operations in the order the wizard calls them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Create the provider user and return its reference.
    async fn create_user(&self, request: &CreateUserRequest)
    -> Result<ProviderUserId, RelayApiError>;

    /// Issue a bridge token for the user.
    async fn issue_bridge_token(&self, user: &ProviderUserId)
    -> Result<BridgeToken, RelayApiError>;

    /// Exchange the widget's public token.
    async fn exchange_public_token(
        &self,
        public_token: &PublicToken,
    ) -> Result<LinkAccess, RelayApiError>;

    /// Fetch the verification document for a link.
    async fn fetch_employment(&self, link_id: &LinkId)
    -> Result<VerificationPayload, RelayApiError>;
}
