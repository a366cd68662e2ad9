//! Relay server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use mockable::Env;
use tracing::warn;

use fastpass::domain::ports::VerificationProvider;
use fastpass::outbound::truv::BuildMode;

const PORT_ENV: &str = "PORT";
const BIND_HOST_ENV: &str = "BIND_HOST";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Everything the relay server needs at startup.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) provider: Arc<dyn VerificationProvider>,
}

impl ServerConfig {
    /// Bundle the listen address with the provider adapter.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, provider: Arc<dyn VerificationProvider>) -> Self {
        Self {
            bind_addr,
            provider,
        }
    }
}

/// Errors raised while reading the listen address.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BindConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Read `BIND_HOST` and `PORT`, defaulting to `0.0.0.0:5000`.
///
/// Debug builds fall back to the defaults on invalid values; release builds
/// refuse to start.
pub fn bind_addr_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<SocketAddr, BindConfigError> {
    let host = match env.string(BIND_HOST_ENV) {
        None => DEFAULT_HOST,
        Some(value) => match value.trim().parse::<IpAddr>() {
            Ok(host) => host,
            Err(_) if mode == BuildMode::Debug => {
                warn!(value = %value, "invalid BIND_HOST; using 0.0.0.0");
                DEFAULT_HOST
            }
            Err(_) => {
                return Err(BindConfigError::InvalidEnv {
                    name: BIND_HOST_ENV,
                    value,
                    expected: "an IPv4 or IPv6 address",
                });
            }
        },
    };
    let port = match env.string(PORT_ENV) {
        None => DEFAULT_PORT,
        Some(value) => match value.trim().parse::<u16>() {
            Ok(port) => port,
            Err(_) if mode == BuildMode::Debug => {
                warn!(value = %value, "invalid PORT; using {DEFAULT_PORT}");
                DEFAULT_PORT
            }
            Err(_) => {
                return Err(BindConfigError::InvalidEnv {
                    name: PORT_ENV,
                    value,
                    expected: "a port number between 0 and 65535",
                });
            }
        },
    };
    Ok(SocketAddr::new(host, port))
}
