//! Verification relay handlers.
//!
//! ```text
//! POST /api/truv-create-user            {"user_id":"borrower-jane-1700000000000"}
//! POST /api/truv-bridge-token           {"user_id":"<provider user id>"}
//! POST /api/truv-exchange-public-token  {"public_token":"<token>"}
//! GET  /api/truv-employment/{link_id}
//! ```
//!
//! Each handler makes exactly one provider call and returns the provider's
//! JSON unchanged. Provider failures become `500` with the provider's error
//! body in `details`.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use super::ApiResult;
use super::error::Error;
use super::state::HttpState;
use super::validation::{FieldName, require_field};
use crate::domain::ports::{NewProviderUser, ProductType, VerificationProviderError};
use crate::domain::{LinkId, ProviderUserId, PublicToken};

const USER_ID: FieldName = FieldName::new("user_id");
const PUBLIC_TOKEN: FieldName = FieldName::new("public_token");
const LINK_ID: FieldName = FieldName::new("link_id");

/// Request body for `POST /api/truv-create-user`.
///
/// Example JSON:
/// `{"user_id":"borrower-jane-doe-1700000000000","first_name":"Jane Doe"}`
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserBody {
    /// External identifier stored by the provider.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Defaults to `John`.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Defaults to `Doe`.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Defaults to `borrower@example.com`.
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for `POST /api/truv-bridge-token`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BridgeTokenBody {
    /// Provider user id returned by user creation.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Verification product; defaults to `employment`.
    #[serde(default)]
    pub product_type: Option<ProductType>,
}

/// Request body for `POST /api/truv-exchange-public-token`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ExchangeTokenBody {
    /// Token reported by the bridge widget.
    #[serde(default)]
    pub public_token: Option<String>,
}

fn provider_failure(message: &'static str, err: VerificationProviderError) -> Error {
    match &err {
        VerificationProviderError::Rejected { status, .. } => {
            error!(kind = err.kind(), status, "{message}");
        }
        other => error!(kind = other.kind(), error = %other, "{message}"),
    }
    let details = err.provider_body().cloned();
    Error::upstream(message).with_optional_details(details)
}

/// Create a provider user.
#[utoipa::path(
    post,
    path = "/api/truv-create-user",
    request_body = CreateUserBody,
    responses(
        (status = 200, description = "Provider user record"),
        (status = 400, description = "Missing user_id or malformed body", body = Error),
        (status = 500, description = "Provider call failed", body = Error)
    ),
    tags = ["relay"],
    operation_id = "createUser"
)]
#[post("/truv-create-user")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<web::Json<Value>> {
    let body = payload.into_inner();
    let user_id = require_field(body.user_id, USER_ID)?;
    let user = NewProviderUser::with_defaults(
        user_id,
        body.first_name.as_deref(),
        body.last_name.as_deref(),
        body.email.as_deref(),
    );
    let created = state
        .provider
        .create_user(&user)
        .await
        .map_err(|err| provider_failure("Failed to create user", err))?;
    info!(external_user_id = %user.external_user_id, "provider user created");
    Ok(web::Json(created))
}

/// Issue a bridge token for a provider user.
#[utoipa::path(
    post,
    path = "/api/truv-bridge-token",
    request_body = BridgeTokenBody,
    responses(
        (status = 200, description = "Bridge token record"),
        (status = 400, description = "Missing user_id or malformed body", body = Error),
        (status = 500, description = "Provider call failed", body = Error)
    ),
    tags = ["relay"],
    operation_id = "issueBridgeToken"
)]
#[post("/truv-bridge-token")]
pub async fn bridge_token(
    state: web::Data<HttpState>,
    payload: web::Json<BridgeTokenBody>,
) -> ApiResult<web::Json<Value>> {
    let body = payload.into_inner();
    let user_id = ProviderUserId::new(require_field(body.user_id, USER_ID)?);
    let product = body.product_type.unwrap_or_default();
    let token = state
        .provider
        .issue_bridge_token(&user_id, product)
        .await
        .map_err(|err| provider_failure("Failed to get bridge token", err))?;
    Ok(web::Json(token))
}

/// Exchange a bridge public token for link access.
#[utoipa::path(
    post,
    path = "/api/truv-exchange-public-token",
    request_body = ExchangeTokenBody,
    responses(
        (status = 200, description = "Access token and link id"),
        (status = 400, description = "Missing public_token or malformed body", body = Error),
        (status = 500, description = "Provider call failed", body = Error)
    ),
    tags = ["relay"],
    operation_id = "exchangePublicToken"
)]
#[post("/truv-exchange-public-token")]
pub async fn exchange_public_token(
    state: web::Data<HttpState>,
    payload: web::Json<ExchangeTokenBody>,
) -> ApiResult<web::Json<Value>> {
    let raw = require_field(payload.into_inner().public_token, PUBLIC_TOKEN)?;
    let public_token = PublicToken::new(raw);
    let access = state
        .provider
        .exchange_public_token(&public_token)
        .await
        .map_err(|err| provider_failure("Failed to exchange token", err))?;
    Ok(web::Json(access))
}

/// Fetch the employment verification document for a link.
#[utoipa::path(
    get,
    path = "/api/truv-employment/{link_id}",
    params(("link_id" = String, Path, description = "Provider link id")),
    responses(
        (status = 200, description = "Employment verification document"),
        (status = 400, description = "Blank link_id", body = Error),
        (status = 500, description = "Provider call failed", body = Error)
    ),
    tags = ["relay"],
    operation_id = "fetchEmployment"
)]
#[get("/truv-employment/{link_id}")]
pub async fn employment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Value>> {
    let link_id = LinkId::new(require_field(Some(path.into_inner()), LINK_ID)?);
    let document = state
        .provider
        .fetch_employment(&link_id)
        .await
        .map_err(|err| provider_failure("Failed to fetch employment data", err))?;
    Ok(web::Json(document))
}

/// Register the relay routes under `/api`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use fastpass::inbound::http::relay;
///
/// let app = App::new().service(web::scope("/api").configure(relay::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(bridge_token)
        .service(exchange_public_token)
        .service(employment);
}
