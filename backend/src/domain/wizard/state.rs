//! Observable wizard state.

use super::WizardError;
use crate::domain::{BorrowerIdentity, VerifiedReport};

/// Screen the wizard is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    /// Collecting the borrower's name.
    #[default]
    Start,
    /// Waiting on the bridge widget.
    Bridge,
    /// Waiting on the payer.
    Pay,
    /// Report delivered.
    Done,
}

impl WizardStep {
    /// One-based position shown in the step indicator.
    pub fn number(self) -> u8 {
        match self {
            Self::Start => 1,
            Self::Bridge => 2,
            Self::Pay => 3,
            Self::Done => 4,
        }
    }
}

/// Snapshot published after every transition.
///
/// ## Invariants
/// - `report` is present on `Pay` and `Done`.
/// - `report.payment` is present only on `Done`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardState {
    /// Current screen.
    pub step: WizardStep,
    /// Borrower captured from the start form.
    pub borrower: Option<BorrowerIdentity>,
    /// Verified report, once accepted.
    pub report: Option<VerifiedReport>,
    /// Whether a provider or processor call is in flight.
    pub loading: bool,
    /// Most recent failure, cleared when the next attempt starts.
    pub error: Option<WizardError>,
}
