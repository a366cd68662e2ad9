//! Opaque provider handles and the verification payload.
//!
//! None of these values are interpreted beyond presence checks; they are
//! handed from one provider call to the next exactly as received.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::payment::PaymentCapture;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw value received from the provider or a widget.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw value.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_handle! {
    /// Provider-assigned user reference returned by user creation.
    ProviderUserId
}

opaque_handle! {
    /// Token used to open the bridge widget for one user.
    BridgeToken
}

opaque_handle! {
    /// Short-lived token the bridge widget reports on success.
    PublicToken
}

opaque_handle! {
    /// Access credential returned by the public token exchange.
    AccessToken
}

opaque_handle! {
    /// Provider handle for a completed payroll connection.
    LinkId
}

/// Result of exchanging a public token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAccess {
    /// Access credential for the link. Unused by the wizard beyond the exchange.
    pub access_token: AccessToken,
    /// Link reference used to fetch verification data.
    pub link_id: LinkId,
}

/// Verification JSON exactly as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationPayload(Value);

impl VerificationPayload {
    /// Wrap a provider document.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the document.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Whether the document carries content worth charging for.
    ///
    /// Accepts an object with a non-empty `employments` array, or a
    /// non-empty string or numeric `id`.
    ///
    /// # Examples
    /// ```
    /// use fastpass::domain::VerificationPayload;
    /// use serde_json::json;
    ///
    /// assert!(VerificationPayload::new(json!({ "employments": [{ "id": "e1" }] })).is_recognisable());
    /// assert!(!VerificationPayload::new(json!({ "employments": [] })).is_recognisable());
    /// assert!(!VerificationPayload::new(json!({})).is_recognisable());
    /// ```
    pub fn is_recognisable(&self) -> bool {
        let Some(document) = self.0.as_object() else {
            return false;
        };
        let has_employments = document
            .get("employments")
            .and_then(Value::as_array)
            .is_some_and(|entries| !entries.is_empty());
        let has_id = match document.get("id") {
            Some(Value::String(id)) => !id.trim().is_empty(),
            Some(Value::Number(_)) => true,
            _ => false,
        };
        has_employments || has_id
    }

    /// Pretty-printed JSON for previews.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// Report assembled once verification succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedReport {
    /// Borrower name as entered.
    pub borrower_name: String,
    /// Loan application id, if one was entered.
    pub application_id: Option<String>,
    /// When the payload was accepted.
    pub verified_at: DateTime<Utc>,
    /// Provider verification document, unmodified.
    pub verified_data: VerificationPayload,
    /// Link the document was fetched from.
    pub link_id: LinkId,
    /// Capture result, present once payment completes.
    pub payment: Option<PaymentCapture>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({ "employments": [{ "company": { "name": "Acme" } }] }))]
    #[case(json!({ "id": "24d7e80942ce4ad58a93f70ce4115f5c" }))]
    #[case(json!({ "id": 17 }))]
    fn recognises_payloads_with_content(#[case] document: Value) {
        assert!(VerificationPayload::new(document).is_recognisable());
    }

    #[rstest]
    #[case(Value::Null)]
    #[case(json!({}))]
    #[case(json!([]))]
    #[case(json!("employments"))]
    #[case(json!({ "employments": [] }))]
    #[case(json!({ "employments": null }))]
    #[case(json!({ "id": "" }))]
    #[case(json!({ "id": null, "status": "done" }))]
    fn rejects_empty_or_unrecognised_payloads(#[case] document: Value) {
        assert!(!VerificationPayload::new(document).is_recognisable());
    }

    #[test]
    fn payload_serialises_transparently() {
        let document = json!({ "employments": [{ "id": "e1" }] });
        let payload = VerificationPayload::new(document.clone());
        assert_eq!(serde_json::to_value(&payload).expect("serialise"), document);
    }
}
