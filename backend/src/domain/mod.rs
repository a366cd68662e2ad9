//! Domain primitives, ports, and the verification wizard.
//!
//! Purpose: Define the values exchanged between the relay, the verification
//! provider, and the payment processor, plus the state machine that drives
//! a borrower through verification and payment.
//!
//! Public surface:
//! - BorrowerIdentity (alias to `borrower::BorrowerIdentity`): validated
//!   borrower name and optional application id.
//! - VerificationPayload (alias to `verification::VerificationPayload`):
//!   provider document passed through untouched.
//! - Wizard (alias to `wizard::Wizard`): event-driven verification flow.

pub mod borrower;
pub mod payment;
pub mod ports;
pub mod verification;
pub mod wizard;

pub use self::borrower::{BorrowerIdentity, BorrowerValidationError, ExternalUserId};
pub use self::payment::{OrderRequest, PaymentApproval, PaymentCapture};
pub use self::verification::{
    AccessToken, BridgeToken, LinkAccess, LinkId, ProviderUserId, PublicToken,
    VerificationPayload, VerifiedReport,
};
pub use self::wizard::{
    BridgeEvent, PaymentEvent, Wizard, WizardError, WizardEvent, WizardEvents, WizardInbox,
    WizardPorts, WizardState, WizardStep,
};
