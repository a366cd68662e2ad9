//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the four relay endpoints, the health probes, and the
//! error envelope they share. The document is served by Swagger UI in debug
//! builds and printed by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::ports::ProductType;
use crate::inbound::http::error::{Error, ErrorCode};
use crate::inbound::http::relay::{BridgeTokenBody, CreateUserBody, ExchangeTokenBody};

/// OpenAPI document for the relay.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FastPass verification relay",
        description = "Pass-through façade over the payroll verification provider."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::relay::create_user,
        crate::inbound::http::relay::bridge_token,
        crate::inbound::http::relay::exchange_public_token,
        crate::inbound::http::relay::employment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CreateUserBody,
        BridgeTokenBody,
        ExchangeTokenBody,
        ProductType
    )),
    tags(
        (name = "relay", description = "Verification provider pass-through"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
