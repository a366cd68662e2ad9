//! Events consumed by the wizard loop.

use tokio::sync::mpsc;

use crate::domain::{PaymentApproval, PublicToken};

/// Outcome reported by the bridge widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// The borrower connected a payroll account.
    Success {
        /// Token to exchange for link access.
        public_token: PublicToken,
    },
    /// The widget reported a failure.
    Error {
        /// Widget-provided description.
        message: String,
    },
    /// The borrower closed the widget.
    Closed,
}

/// Outcome reported by the payment checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// The payer approved the order.
    Approved(PaymentApproval),
    /// The checkout reported a failure.
    Error {
        /// Checkout-provided description.
        message: String,
    },
}

/// Everything that can move the wizard forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// The borrower submitted the start form.
    Connect {
        /// Name as typed.
        name: String,
        /// Loan application id as typed; may be blank.
        application_id: String,
    },
    /// Bridge widget callback.
    Bridge(BridgeEvent),
    /// Checkout callback.
    Payment(PaymentEvent),
}

impl WizardEvent {
    /// Short label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Bridge(BridgeEvent::Success { .. }) => "bridge_success",
            Self::Bridge(BridgeEvent::Error { .. }) => "bridge_error",
            Self::Bridge(BridgeEvent::Closed) => "bridge_closed",
            Self::Payment(PaymentEvent::Approved(_)) => "payment_approved",
            Self::Payment(PaymentEvent::Error { .. }) => "payment_error",
        }
    }
}

/// Sending half handed to adapters so their callbacks can reach the wizard.
///
/// Sending never blocks, which lets synchronous widget callbacks post events.
#[derive(Debug, Clone)]
pub struct WizardEvents {
    tx: mpsc::UnboundedSender<WizardEvent>,
}

/// Receiving half consumed by [`Wizard::run`](super::Wizard::run).
pub type WizardInbox = mpsc::UnboundedReceiver<WizardEvent>;

impl WizardEvents {
    /// Create a connected sender and inbox.
    ///
    /// # Examples
    /// ```
    /// use fastpass::domain::{BridgeEvent, WizardEvent, WizardEvents};
    ///
    /// let (events, mut inbox) = WizardEvents::channel();
    /// assert!(events.bridge(BridgeEvent::Closed));
    /// assert_eq!(inbox.try_recv().ok(), Some(WizardEvent::Bridge(BridgeEvent::Closed)));
    /// ```
    pub fn channel() -> (Self, WizardInbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Post an event; returns `false` once the wizard has stopped listening.
    pub fn send(&self, event: WizardEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Post the start form.
    pub fn connect(&self, name: impl Into<String>, application_id: impl Into<String>) -> bool {
        self.send(WizardEvent::Connect {
            name: name.into(),
            application_id: application_id.into(),
        })
    }

    /// Post a bridge widget callback.
    pub fn bridge(&self, event: BridgeEvent) -> bool {
        self.send(WizardEvent::Bridge(event))
    }

    /// Post a checkout callback.
    pub fn payment(&self, event: PaymentEvent) -> bool {
        self.send(WizardEvent::Payment(event))
    }
}
