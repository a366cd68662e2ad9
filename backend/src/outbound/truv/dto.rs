//! Wire bodies sent to the provider.

use serde::Serialize;

use crate::domain::ports::{NewProviderUser, ProductType};

/// Tag attached to bridge sessions so provider dashboards can group them.
pub(super) const TRACKING_INFO: &str = "VoE-app-demo";

#[derive(Debug, Serialize)]
pub(super) struct CreateUserDto<'a> {
    pub external_user_id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a NewProviderUser> for CreateUserDto<'a> {
    fn from(user: &'a NewProviderUser) -> Self {
        Self {
            external_user_id: &user.external_user_id,
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct BridgeTokenDto {
    pub product_type: ProductType,
    pub tracking_info: &'static str,
}

impl BridgeTokenDto {
    pub(super) fn new(product_type: ProductType) -> Self {
        Self {
            product_type,
            tracking_info: TRACKING_INFO,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PublicTokenDto<'a> {
    pub public_token: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bridge_token_body_matches_provider_contract() {
        let body = serde_json::to_value(BridgeTokenDto::new(ProductType::Income)).expect("encode");
        assert_eq!(
            body,
            json!({ "product_type": "income", "tracking_info": "VoE-app-demo" })
        );
    }

    #[test]
    fn create_user_body_carries_every_field() {
        let user = NewProviderUser::with_defaults("borrower-jane-1", Some("Jane"), None, None);
        let body = serde_json::to_value(CreateUserDto::from(&user)).expect("encode");
        assert_eq!(
            body,
            json!({
                "external_user_id": "borrower-jane-1",
                "first_name": "Jane",
                "last_name": "Doe",
                "email": "borrower@example.com"
            })
        );
    }
}
