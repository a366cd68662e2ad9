//! Borrower verification wizard.
//!
//! The wizard owns a [`WizardState`] and advances it one [`WizardEvent`] at a
//! time. Adapters never touch the state: the bridge widget and the checkout
//! post their outcomes through a [`WizardEvents`] handle and the loop in
//! [`Wizard::run`] applies them in arrival order. Every transition publishes
//! a snapshot on a `watch` channel for views to render.
//!
//! Transitions:
//!
//! | Step   | Event              | Next step | Side effects                              |
//! |--------|--------------------|-----------|-------------------------------------------|
//! | Start  | Connect            | Bridge    | create user, issue token, open widget     |
//! | Bridge | Bridge success     | Pay       | exchange token, fetch data, render order  |
//! | Bridge | Bridge error       | Bridge    | record error                              |
//! | Pay    | Payment approved   | Done      | capture order, attach receipt             |
//! | Pay    | Payment error      | Pay       | record error                              |
//!
//! Any other pairing is ignored.

mod error;
mod event;
mod state;

#[cfg(test)]
mod tests;

use std::error::Error as _;
use std::sync::Arc;

use mockable::Clock;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub use self::error::WizardError;
pub use self::event::{BridgeEvent, PaymentEvent, WizardEvent, WizardEvents, WizardInbox};
pub use self::state::{WizardState, WizardStep};

use crate::domain::ports::{
    BridgeWidget, BridgeWidgetError, CreateUserRequest, PaymentCheckout, RelayApi, RelayApiError,
};
use crate::domain::{
    BorrowerIdentity, BridgeToken, LinkId, OrderRequest, PaymentApproval, PublicToken,
    VerificationPayload, VerifiedReport,
};

/// Collaborators the wizard drives.
#[derive(Clone)]
pub struct WizardPorts {
    /// Relay service client.
    pub relay: Arc<dyn RelayApi>,
    /// Payroll connection widget.
    pub bridge: Arc<dyn BridgeWidget>,
    /// Payment checkout.
    pub checkout: Arc<dyn PaymentCheckout>,
    /// Time source for ids and report timestamps.
    pub clock: Arc<dyn Clock>,
}

/// Event-driven verification and payment flow.
pub struct Wizard {
    ports: WizardPorts,
    order: OrderRequest,
    events: WizardEvents,
    state: WizardState,
    snapshots: watch::Sender<WizardState>,
}

impl Wizard {
    /// Build a wizard on the start screen.
    ///
    /// `events` must be the sender paired with the inbox later passed to
    /// [`Wizard::run`]; adapters receive clones of it.
    pub fn new(
        ports: WizardPorts,
        order: OrderRequest,
        events: WizardEvents,
    ) -> (Self, watch::Receiver<WizardState>) {
        let (snapshots, receiver) = watch::channel(WizardState::default());
        let wizard = Self {
            ports,
            order,
            events,
            state: WizardState::default(),
            snapshots,
        };
        (wizard, receiver)
    }

    /// Current state.
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Apply events until the report is delivered or every sender is dropped.
    pub async fn run(mut self, mut inbox: WizardInbox) -> WizardState {
        while let Some(event) = inbox.recv().await {
            self.handle(event).await;
            if self.state.step == WizardStep::Done {
                break;
            }
        }
        self.state
    }

    /// Apply a single event.
    pub async fn handle(&mut self, event: WizardEvent) {
        match (self.state.step, event) {
            (WizardStep::Start, WizardEvent::Connect { name, application_id }) => {
                self.connect(&name, &application_id).await;
            }
            (WizardStep::Bridge, WizardEvent::Bridge(BridgeEvent::Success { public_token })) => {
                self.verify(&public_token).await;
            }
            (WizardStep::Bridge, WizardEvent::Bridge(BridgeEvent::Error { message })) => {
                self.fail(WizardError::BridgeFailed { message });
            }
            (WizardStep::Bridge, WizardEvent::Bridge(BridgeEvent::Closed)) => {
                debug!("bridge widget closed");
            }
            (WizardStep::Pay, WizardEvent::Payment(PaymentEvent::Approved(approval))) => {
                self.capture(&approval).await;
            }
            (WizardStep::Pay, WizardEvent::Payment(PaymentEvent::Error { message })) => {
                self.fail(WizardError::PaymentFailed { message });
            }
            (step, event) => {
                debug!(?step, event = event.label(), "event ignored on this step");
            }
        }
    }

    async fn connect(&mut self, name: &str, application_id: &str) {
        self.update(|state| {
            state.error = None;
            state.loading = true;
        });
        let Ok(borrower) = BorrowerIdentity::new(name, application_id) else {
            self.fail(WizardError::EmptyBorrowerName);
            return;
        };
        self.update(|state| state.borrower = Some(borrower.clone()));

        let token = match self.open_session(&borrower).await {
            Ok(token) => token,
            Err(error) => {
                self.fail(WizardError::Connect(error));
                return;
            }
        };
        if let Err(error) = self.ports.bridge.open(&token, self.events.clone()) {
            self.fail(match error {
                BridgeWidgetError::Launch { message } => WizardError::BridgeFailed { message },
                unavailable @ BridgeWidgetError::Unavailable => {
                    WizardError::BridgeUnavailable(unavailable)
                }
            });
            return;
        }
        info!(borrower = borrower.name(), "bridge widget opened");
        self.update(|state| {
            state.step = WizardStep::Bridge;
            state.loading = false;
        });
    }

    async fn open_session(&self, borrower: &BorrowerIdentity) -> Result<BridgeToken, RelayApiError> {
        let request = CreateUserRequest {
            user_id: borrower.external_user_id(self.ports.clock.utc()),
            first_name: borrower.name().to_owned(),
        };
        let user = self.ports.relay.create_user(&request).await?;
        debug!(external_user_id = %request.user_id, provider_user_id = %user, "provider user created");
        self.ports.relay.issue_bridge_token(&user).await
    }

    async fn verify(&mut self, public_token: &PublicToken) {
        self.update(|state| {
            state.error = None;
            state.loading = true;
        });
        let (link_id, payload) = match self.retrieve(public_token).await {
            Ok(retrieved) => retrieved,
            Err(error) => {
                self.fail(WizardError::Retrieval(error));
                return;
            }
        };
        if !payload.is_recognisable() {
            self.fail(WizardError::NoVerifiedData);
            return;
        }

        let (borrower_name, application_id) = self
            .state
            .borrower
            .as_ref()
            .map(|borrower| {
                (
                    borrower.name().to_owned(),
                    borrower.application_id().map(str::to_owned),
                )
            })
            .unwrap_or_default();
        let report = VerifiedReport {
            borrower_name,
            application_id,
            verified_at: self.ports.clock.utc(),
            verified_data: payload,
            link_id,
            payment: None,
        };
        info!(link_id = %report.link_id, "verification data accepted");
        self.update(|state| {
            state.report = Some(report);
            state.step = WizardStep::Pay;
            state.loading = false;
        });

        if let Err(error) = self
            .ports
            .checkout
            .render(&self.order, self.events.clone())
            .await
        {
            warn!(error = %error, kind = error.kind(), "payment checkout failed to render");
        }
    }

    async fn retrieve(
        &self,
        public_token: &PublicToken,
    ) -> Result<(LinkId, VerificationPayload), RelayApiError> {
        let access = self.ports.relay.exchange_public_token(public_token).await?;
        let payload = self.ports.relay.fetch_employment(&access.link_id).await?;
        Ok((access.link_id, payload))
    }

    async fn capture(&mut self, approval: &PaymentApproval) {
        self.update(|state| {
            state.error = None;
            state.loading = true;
        });
        match self.ports.checkout.capture(approval).await {
            Ok(capture) => {
                info!(order_id = %approval.order_id, "payment captured");
                self.update(|state| {
                    if let Some(report) = state.report.as_mut() {
                        report.payment = Some(capture);
                    }
                    state.step = WizardStep::Done;
                    state.loading = false;
                });
            }
            Err(error) => self.fail(WizardError::Capture(error)),
        }
    }

    fn fail(&mut self, error: WizardError) {
        let detail = match &error {
            WizardError::BridgeFailed { message } | WizardError::PaymentFailed { message } => {
                Some(message.clone())
            }
            other => other.source().map(ToString::to_string),
        };
        warn!(
            kind = error.label(),
            detail = detail.as_deref().unwrap_or_default(),
            "{error}"
        );
        self.update(|state| {
            state.error = Some(error);
            state.loading = false;
        });
    }

    fn update(&mut self, apply: impl FnOnce(&mut WizardState)) {
        apply(&mut self.state);
        self.snapshots.send_replace(self.state.clone());
    }
}
