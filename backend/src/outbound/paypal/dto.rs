//! Orders v2 wire types.

use serde::{Deserialize, Serialize};

use crate::domain::OrderRequest;

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateOrderDto<'a> {
    pub intent: &'static str,
    pub purchase_units: [PurchaseUnitDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct PurchaseUnitDto<'a> {
    pub amount: AmountDto<'a>,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct AmountDto<'a> {
    pub currency_code: &'a str,
    pub value: &'a str,
}

impl<'a> From<&'a OrderRequest> for CreateOrderDto<'a> {
    fn from(order: &'a OrderRequest) -> Self {
        Self {
            intent: "CAPTURE",
            purchase_units: [PurchaseUnitDto {
                amount: AmountDto {
                    currency_code: &order.currency,
                    value: &order.amount,
                },
                description: &order.description,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct OrderResponseDto {
    pub id: String,
    #[serde(default)]
    pub links: Vec<LinkDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LinkDto {
    pub href: String,
    pub rel: String,
}

impl OrderResponseDto {
    /// Link the payer follows to approve the order.
    pub(super) fn approval_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "approve" || link.rel == "payer-action")
            .map(|link| link.href.as_str())
    }
}
