//! Capability port for the provider's bridge widget.
//!
//! Opening the widget returns immediately. The widget reports its outcome
//! later by posting a [`BridgeEvent`](crate::domain::wizard::BridgeEvent)
//! through the supplied [`WizardEvents`] handle.

use super::define_port_error;
use crate::domain::BridgeToken;
use crate::domain::wizard::WizardEvents;

define_port_error! {
    /// Errors raised while opening the widget.
    pub enum BridgeWidgetError {
        /// No widget implementation is loaded.
        Unavailable => "bridge widget is not available",
        /// The widget refused to open.
        Launch { message: String } => "bridge widget failed to open: {message}",
    }
}

/// Payroll connection widget.
#[cfg_attr(test, mockall::automock)]
pub trait BridgeWidget: Send + Sync {
    /// Open the widget for a bridge token.
    fn open(&self, token: &BridgeToken, events: WizardEvents) -> Result<(), BridgeWidgetError>;
}
