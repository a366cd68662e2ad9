//! Provider credentials and connection settings.
//!
//! Values come from the environment through [`mockable::Env`] so they can be
//! validated in isolation. Release builds refuse to start without
//! credentials; debug builds warn and fall back to empty sandbox values.

use std::fmt;
use std::time::Duration;

use mockable::Env;
use tracing::warn;
use url::Url;
use zeroize::Zeroizing;

pub(crate) const CLIENT_ID_ENV: &str = "TRUV_CLIENT_ID";
pub(crate) const SECRET_ENV: &str = "TRUV_SECRET";
pub(crate) const BASE_URL_ENV: &str = "TRUV_BASE_URL";
pub(crate) const TIMEOUT_ENV: &str = "TRUV_TIMEOUT_SECONDS";

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.truv.com/v1";
/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const URL_EXPECTED: &str = "an absolute http(s) URL";
const SECONDS_EXPECTED: &str = "a positive whole number of seconds";

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing values and warn.
    Debug,
    /// Release builds require every credential.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fastpass::outbound::truv::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Settings for the provider adapter.
pub struct TruvSettings {
    /// API client id, sent as the Basic auth user.
    pub client_id: String,
    /// API secret, sent as the Basic auth password.
    pub secret: Zeroizing<String>,
    /// API root; request paths are appended to it.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for TruvSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TruvSettings")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Errors raised while validating provider configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TruvConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Build provider settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use fastpass::outbound::truv::{BuildMode, truv_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "TRUV_CLIENT_ID" => Some("client-1".to_owned()),
///     "TRUV_SECRET" => Some("s3cret".to_owned()),
///     _ => None,
/// });
///
/// let settings = truv_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.base_url.as_str(), "https://api.truv.com/v1");
/// assert_eq!(settings.timeout.as_secs(), 30);
/// ```
pub fn truv_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TruvSettings, TruvConfigError> {
    let client_id = credential_from_env(env, mode, CLIENT_ID_ENV)?;
    let secret = Zeroizing::new(credential_from_env(env, mode, SECRET_ENV)?);
    let base_url = base_url_from_env(env, mode)?;
    let timeout = timeout_from_env(env, mode)?;
    Ok(TruvSettings {
        client_id,
        secret,
        base_url,
        timeout,
    })
}

fn credential_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
) -> Result<String, TruvConfigError> {
    match env.string(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => Ok(value),
        None if mode.is_debug() => {
            warn!(variable = name, "credential not set; provider calls will be rejected");
            Ok(String::new())
        }
        None => Err(TruvConfigError::MissingEnv { name }),
    }
}

fn base_url_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Url, TruvConfigError> {
    let Some(value) = env.string(BASE_URL_ENV) else {
        return default_base_url();
    };
    match parse_base_url(&value) {
        Some(url) => Ok(url),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid TRUV_BASE_URL; using default");
            default_base_url()
        }
        None => Err(TruvConfigError::InvalidEnv {
            name: BASE_URL_ENV,
            value,
            expected: URL_EXPECTED,
        }),
    }
}

fn default_base_url() -> Result<Url, TruvConfigError> {
    parse_base_url(DEFAULT_BASE_URL).ok_or(TruvConfigError::InvalidEnv {
        name: BASE_URL_ENV,
        value: DEFAULT_BASE_URL.to_owned(),
        expected: URL_EXPECTED,
    })
}

pub(crate) fn parse_base_url(value: &str) -> Option<Url> {
    let url = Url::parse(value.trim()).ok()?;
    let usable = matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base();
    usable.then_some(url)
}

fn timeout_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, TruvConfigError> {
    let default = Duration::from_secs(DEFAULT_TIMEOUT_SECONDS);
    let Some(value) = env.string(TIMEOUT_ENV) else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid TRUV_TIMEOUT_SECONDS; using default");
            Ok(default)
        }
        _ => Err(TruvConfigError::InvalidEnv {
            name: TIMEOUT_ENV,
            value,
            expected: SECONDS_EXPECTED,
        }),
    }
}
