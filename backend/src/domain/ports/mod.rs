//! Domain ports and supporting types for the hexagonal boundary.
//!
//! The relay drives [`VerificationProvider`]; the wizard drives [`RelayApi`],
//! [`BridgeWidget`] and [`PaymentCheckout`]. Each port exposes a typed error
//! enum so adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod bridge_widget;
mod payment_checkout;
mod relay_api;
mod verification_provider;

#[cfg(test)]
pub use bridge_widget::MockBridgeWidget;
pub use bridge_widget::{BridgeWidget, BridgeWidgetError};
#[cfg(test)]
pub use payment_checkout::MockPaymentCheckout;
pub use payment_checkout::{PaymentCheckout, PaymentCheckoutError};
#[cfg(test)]
pub use relay_api::MockRelayApi;
pub use relay_api::{CreateUserRequest, RelayApi, RelayApiError};
#[cfg(test)]
pub use verification_provider::MockVerificationProvider;
pub use verification_provider::{
    DEFAULT_EMAIL, DEFAULT_FIRST_NAME, DEFAULT_LAST_NAME, NewProviderUser, ProductType,
    VerificationProvider, VerificationProviderError,
};
