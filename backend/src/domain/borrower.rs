//! Borrower identity captured on the wizard's start screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised while capturing a borrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BorrowerValidationError {
    /// The name was empty once trimmed.
    #[error("borrower name must not be empty")]
    EmptyName,
}

/// Borrower name and optional loan application id.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - `application_id` is trimmed; a blank id is stored as `None`.
///
/// # Examples
/// ```
/// use fastpass::domain::BorrowerIdentity;
///
/// let borrower = BorrowerIdentity::new("  Jane Doe ", "").expect("valid name");
/// assert_eq!(borrower.name(), "Jane Doe");
/// assert!(borrower.application_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerIdentity {
    name: String,
    application_id: Option<String>,
}

impl BorrowerIdentity {
    /// Validate raw form input.
    pub fn new(name: &str, application_id: &str) -> Result<Self, BorrowerValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BorrowerValidationError::EmptyName);
        }
        let application_id = application_id.trim();
        Ok(Self {
            name: name.to_owned(),
            application_id: (!application_id.is_empty()).then(|| application_id.to_owned()),
        })
    }

    /// Trimmed borrower name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Trimmed application id, if one was supplied.
    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    /// Synthesize the identifier the provider stores as `external_user_id`.
    ///
    /// The name is lower-cased with whitespace runs collapsed to `-`, and the
    /// Unix timestamp in milliseconds keeps repeated attempts distinct.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use fastpass::domain::BorrowerIdentity;
    ///
    /// let borrower = BorrowerIdentity::new("Jane  Doe", "").expect("valid name");
    /// let now = Utc.timestamp_millis_opt(1_700_000_000_123).single().expect("valid time");
    /// assert_eq!(
    ///     borrower.external_user_id(now).as_str(),
    ///     "borrower-jane-doe-1700000000123"
    /// );
    /// ```
    pub fn external_user_id(&self, now: DateTime<Utc>) -> ExternalUserId {
        let slug = self
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        ExternalUserId(format!("borrower-{slug}-{}", now.timestamp_millis()))
    }
}

/// Caller-chosen identifier sent to the provider when creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalUserId(String);

impl ExternalUserId {
    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ExternalUserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
