//! Relay entry-point: reads provider settings, wires the relay routes, and
//! serves them until interrupted.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fastpass::inbound::http::health::HealthState;
use fastpass::outbound::truv::fingerprint::credential_fingerprint;
use fastpass::outbound::truv::{BuildMode, TruvHttpProvider, truv_settings_from_env};
use server::{ServerConfig, bind_addr_from_env, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let mode = BuildMode::from_debug_assertions();
    let settings = truv_settings_from_env(&env, mode).map_err(std::io::Error::other)?;
    let bind_addr = bind_addr_from_env(&env, mode).map_err(std::io::Error::other)?;
    info!(
        client = %credential_fingerprint(&settings.client_id),
        base_url = %settings.base_url,
        timeout_secs = settings.timeout.as_secs(),
        "provider configured"
    );

    let provider = TruvHttpProvider::new(settings)
        .map_err(|e| std::io::Error::other(format!("provider client: {e}")))?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(bind_addr, Arc::new(provider)),
    )?;
    info!(%bind_addr, "relay listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
