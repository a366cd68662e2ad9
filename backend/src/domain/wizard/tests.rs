//! Transition coverage for the verification wizard.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::{
    BridgeWidgetError, MockBridgeWidget, MockPaymentCheckout, MockRelayApi,
    PaymentCheckoutError,
};
use crate::domain::{AccessToken, LinkAccess, PaymentCapture, ProviderUserId};

const NOW_MILLIS: i64 = 1_700_000_000_123;

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(NOW_MILLIS)
            .single()
            .unwrap_or_default()
    }
}

fn order() -> OrderRequest {
    OrderRequest {
        amount: "0.01".to_owned(),
        currency: "USD".to_owned(),
        description: "Employment verification report".to_owned(),
    }
}

fn verified_payload() -> VerificationPayload {
    VerificationPayload::new(json!({
        "id": "24d7e80942ce4ad58a93f70ce4115f5c",
        "employments": [{ "company": { "name": "Facebook Demo" }, "is_active": true }]
    }))
}

fn relay_through_bridge() -> MockRelayApi {
    let mut relay = MockRelayApi::new();
    relay
        .expect_create_user()
        .times(1)
        .returning(|_| Ok(ProviderUserId::new("user-1")));
    relay
        .expect_issue_bridge_token()
        .with(eq(ProviderUserId::new("user-1")))
        .times(1)
        .returning(|_| Ok(BridgeToken::new("bridge-1")));
    relay
}

fn relay_through_retrieval(payload: VerificationPayload) -> MockRelayApi {
    let mut relay = relay_through_bridge();
    relay
        .expect_exchange_public_token()
        .with(eq(PublicToken::new("public-1")))
        .times(1)
        .returning(|_| {
            Ok(LinkAccess {
                access_token: AccessToken::new("access-1"),
                link_id: LinkId::new("link-1"),
            })
        });
    relay
        .expect_fetch_employment()
        .with(eq(LinkId::new("link-1")))
        .times(1)
        .return_once(move |_| Ok(payload));
    relay
}

fn opening_bridge() -> MockBridgeWidget {
    let mut bridge = MockBridgeWidget::new();
    bridge.expect_open().times(1).returning(|_, _| Ok(()));
    bridge
}

fn make_wizard(
    relay: MockRelayApi,
    bridge: MockBridgeWidget,
    checkout: MockPaymentCheckout,
) -> (Wizard, WizardInbox, watch::Receiver<WizardState>) {
    let (events, inbox) = WizardEvents::channel();
    let ports = WizardPorts {
        relay: Arc::new(relay),
        bridge: Arc::new(bridge),
        checkout: Arc::new(checkout),
        clock: Arc::new(FixtureClock),
    };
    let (wizard, snapshots) = Wizard::new(ports, order(), events);
    (wizard, inbox, snapshots)
}

fn connect(name: &str) -> WizardEvent {
    WizardEvent::Connect {
        name: name.to_owned(),
        application_id: "LN-42".to_owned(),
    }
}

fn bridge_success() -> WizardEvent {
    WizardEvent::Bridge(BridgeEvent::Success {
        public_token: PublicToken::new("public-1"),
    })
}

fn approved() -> WizardEvent {
    WizardEvent::Payment(PaymentEvent::Approved(PaymentApproval {
        order_id: "ORDER-1".to_owned(),
    }))
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn blank_name_stays_on_start_without_calls(#[case] name: &str) {
    let mut relay = MockRelayApi::new();
    relay.expect_create_user().times(0);
    let (mut wizard, _inbox, _snapshots) =
        make_wizard(relay, MockBridgeWidget::new(), MockPaymentCheckout::new());

    wizard.handle(connect(name)).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Start);
    assert_eq!(state.error, Some(WizardError::EmptyBorrowerName));
    assert!(!state.loading);
}

#[tokio::test]
async fn connect_creates_user_with_synthesized_id_and_opens_bridge() {
    let mut relay = MockRelayApi::new();
    relay
        .expect_create_user()
        .withf(|request| {
            request.user_id.as_str() == "borrower-jane-doe-1700000000123"
                && request.first_name == "Jane Doe"
        })
        .times(1)
        .returning(|_| Ok(ProviderUserId::new("user-1")));
    relay
        .expect_issue_bridge_token()
        .times(1)
        .returning(|_| Ok(BridgeToken::new("bridge-1")));
    let mut bridge = MockBridgeWidget::new();
    bridge
        .expect_open()
        .withf(|token, _| token.as_str() == "bridge-1")
        .times(1)
        .returning(|_, _| Ok(()));
    let (mut wizard, _inbox, snapshots) = make_wizard(relay, bridge, MockPaymentCheckout::new());

    wizard.handle(connect("  Jane Doe ")).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Bridge);
    assert!(state.error.is_none());
    assert!(!state.loading);
    assert_eq!(
        state.borrower.as_ref().map(BorrowerIdentity::name),
        Some("Jane Doe")
    );
    assert_eq!(*snapshots.borrow(), *state);
}

#[tokio::test]
async fn relay_failure_during_connect_reports_connect_error() {
    let mut relay = MockRelayApi::new();
    relay
        .expect_create_user()
        .times(1)
        .returning(|_| Err(RelayApiError::rejected(500_u16, None::<serde_json::Value>)));
    relay.expect_issue_bridge_token().times(0);
    let mut bridge = MockBridgeWidget::new();
    bridge.expect_open().times(0);
    let (mut wizard, _inbox, _snapshots) = make_wizard(relay, bridge, MockPaymentCheckout::new());

    wizard.handle(connect("Jane Doe")).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Start);
    assert!(matches!(state.error, Some(WizardError::Connect(_))));
    assert_eq!(
        state.error.as_ref().map(ToString::to_string).as_deref(),
        Some("Failed to create user or bridge token.")
    );
    assert!(!state.loading);
}

#[tokio::test]
async fn missing_widget_keeps_start_step() {
    let mut bridge = MockBridgeWidget::new();
    bridge
        .expect_open()
        .times(1)
        .returning(|_, _| Err(BridgeWidgetError::unavailable()));
    let (mut wizard, _inbox, _snapshots) =
        make_wizard(relay_through_bridge(), bridge, MockPaymentCheckout::new());

    wizard.handle(connect("Jane Doe")).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Start);
    assert_eq!(
        state.error,
        Some(WizardError::BridgeUnavailable(BridgeWidgetError::Unavailable))
    );
}

#[tokio::test]
async fn widget_launch_failure_reports_a_connection_error() {
    let mut bridge = MockBridgeWidget::new();
    bridge
        .expect_open()
        .times(1)
        .returning(|_, _| Err(BridgeWidgetError::launch("popup blocked")));
    let (mut wizard, _inbox, _snapshots) =
        make_wizard(relay_through_bridge(), bridge, MockPaymentCheckout::new());

    wizard.handle(connect("Jane Doe")).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Start);
    assert_eq!(
        state.error,
        Some(WizardError::BridgeFailed {
            message: "popup blocked".to_owned()
        })
    );
    assert_eq!(
        state.error.as_ref().map(ToString::to_string).as_deref(),
        Some("Failed to connect with payroll provider.")
    );
    assert!(!state.loading);
}

#[tokio::test]
async fn bridge_success_with_data_moves_to_pay_and_renders_checkout() {
    let mut checkout = MockPaymentCheckout::new();
    checkout
        .expect_render()
        .withf(|order, _| order.amount == "0.01" && order.currency == "USD")
        .times(1)
        .returning(|_, _| Ok(()));
    let (mut wizard, _inbox, _snapshots) = make_wizard(
        relay_through_retrieval(verified_payload()),
        opening_bridge(),
        checkout,
    );

    wizard.handle(connect("Jane Doe")).await;
    wizard.handle(bridge_success()).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Pay);
    assert!(!state.loading);
    let report = state.report.as_ref().expect("report present on pay step");
    assert_eq!(report.borrower_name, "Jane Doe");
    assert_eq!(report.application_id.as_deref(), Some("LN-42"));
    assert_eq!(report.verified_data, verified_payload());
    assert_eq!(report.link_id, LinkId::new("link-1"));
    assert_eq!(report.verified_at.timestamp_millis(), NOW_MILLIS);
    assert!(report.payment.is_none());
}

#[rstest]
#[case(json!({}))]
#[case(json!({ "employments": [] }))]
#[tokio::test]
async fn unrecognised_payload_is_never_charged(#[case] document: serde_json::Value) {
    let mut checkout = MockPaymentCheckout::new();
    checkout.expect_render().times(0);
    checkout.expect_capture().times(0);
    let (mut wizard, _inbox, _snapshots) = make_wizard(
        relay_through_retrieval(VerificationPayload::new(document)),
        opening_bridge(),
        checkout,
    );

    wizard.handle(connect("Jane Doe")).await;
    wizard.handle(bridge_success()).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Bridge);
    assert_eq!(state.error, Some(WizardError::NoVerifiedData));
    assert!(state.report.is_none());
}

#[tokio::test]
async fn retrieval_failure_stays_on_bridge() {
    let mut relay = relay_through_bridge();
    relay
        .expect_exchange_public_token()
        .times(1)
        .returning(|_| Err(RelayApiError::transport("connection refused")));
    relay.expect_fetch_employment().times(0);
    let (mut wizard, _inbox, _snapshots) =
        make_wizard(relay, opening_bridge(), MockPaymentCheckout::new());

    wizard.handle(connect("Jane Doe")).await;
    wizard.handle(bridge_success()).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Bridge);
    assert_eq!(
        state.error.as_ref().map(ToString::to_string).as_deref(),
        Some("Error retrieving employment data.")
    );
}

#[tokio::test]
async fn bridge_error_records_failure_and_stays_on_bridge() {
    let (mut wizard, _inbox, _snapshots) = make_wizard(
        relay_through_bridge(),
        opening_bridge(),
        MockPaymentCheckout::new(),
    );

    wizard.handle(connect("Jane Doe")).await;
    wizard
        .handle(WizardEvent::Bridge(BridgeEvent::Error {
            message: "invalid credentials".to_owned(),
        }))
        .await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Bridge);
    assert_eq!(
        state.error.as_ref().map(ToString::to_string).as_deref(),
        Some("Failed to connect with payroll provider.")
    );
}

#[tokio::test]
async fn checkout_render_failure_keeps_pay_step() {
    let mut checkout = MockPaymentCheckout::new();
    checkout
        .expect_render()
        .times(1)
        .returning(|_, _| Err(PaymentCheckoutError::unavailable()));
    let (mut wizard, _inbox, _snapshots) = make_wizard(
        relay_through_retrieval(verified_payload()),
        opening_bridge(),
        checkout,
    );

    wizard.handle(connect("Jane Doe")).await;
    wizard.handle(bridge_success()).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Pay);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn approval_captures_and_attaches_receipt() {
    let capture = PaymentCapture::new(json!({ "id": "ORDER-1", "status": "COMPLETED" }));
    let mut checkout = MockPaymentCheckout::new();
    checkout.expect_render().times(1).returning(|_, _| Ok(()));
    let expected = capture.clone();
    checkout
        .expect_capture()
        .withf(|approval| approval.order_id == "ORDER-1")
        .times(1)
        .return_once(move |_| Ok(expected));
    let (mut wizard, _inbox, _snapshots) = make_wizard(
        relay_through_retrieval(verified_payload()),
        opening_bridge(),
        checkout,
    );

    wizard.handle(connect("Jane Doe")).await;
    wizard.handle(bridge_success()).await;
    wizard.handle(approved()).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Done);
    let report = state.report.as_ref().expect("report present when done");
    assert_eq!(report.payment.as_ref(), Some(&capture));
    assert_eq!(report.verified_data, verified_payload());
}

#[tokio::test]
async fn capture_failure_stays_on_pay() {
    let mut checkout = MockPaymentCheckout::new();
    checkout.expect_render().times(1).returning(|_, _| Ok(()));
    checkout
        .expect_capture()
        .times(1)
        .returning(|_| {
            Err(PaymentCheckoutError::rejected(
                422_u16,
                "INSTRUMENT_DECLINED",
            ))
        });
    let (mut wizard, _inbox, _snapshots) = make_wizard(
        relay_through_retrieval(verified_payload()),
        opening_bridge(),
        checkout,
    );

    wizard.handle(connect("Jane Doe")).await;
    wizard.handle(bridge_success()).await;
    wizard.handle(approved()).await;

    let state = wizard.state();
    assert_eq!(state.step, WizardStep::Pay);
    assert_eq!(
        state.error.as_ref().map(ToString::to_string).as_deref(),
        Some("Failed to process payment or deliver report.")
    );
    assert!(state.report.as_ref().is_some_and(|report| report.payment.is_none()));
}

#[rstest]
#[case(approved())]
#[case(bridge_success())]
#[case(WizardEvent::Payment(PaymentEvent::Error { message: "boom".to_owned() }))]
#[tokio::test]
async fn events_for_other_steps_are_ignored(#[case] event: WizardEvent) {
    let (mut wizard, _inbox, _snapshots) = make_wizard(
        MockRelayApi::new(),
        MockBridgeWidget::new(),
        MockPaymentCheckout::new(),
    );

    wizard.handle(event).await;

    assert_eq!(*wizard.state(), WizardState::default());
}

#[tokio::test]
async fn run_stops_once_the_report_is_delivered() {
    let mut checkout = MockPaymentCheckout::new();
    checkout
        .expect_render()
        .times(1)
        .returning(|_, events: WizardEvents| {
            events.payment(PaymentEvent::Approved(PaymentApproval {
                order_id: "ORDER-1".to_owned(),
            }));
            Ok(())
        });
    checkout
        .expect_capture()
        .times(1)
        .returning(|_| Ok(PaymentCapture::new(json!({ "status": "COMPLETED" }))));
    let mut bridge = MockBridgeWidget::new();
    bridge
        .expect_open()
        .times(1)
        .returning(|_, events: WizardEvents| {
            events.bridge(BridgeEvent::Success {
                public_token: PublicToken::new("public-1"),
            });
            Ok(())
        });

    let (events, inbox) = WizardEvents::channel();
    let ports = WizardPorts {
        relay: Arc::new(relay_through_retrieval(verified_payload())),
        bridge: Arc::new(bridge),
        checkout: Arc::new(checkout),
        clock: Arc::new(FixtureClock),
    };
    let (wizard, snapshots) = Wizard::new(ports, order(), events.clone());
    assert!(events.connect("Jane Doe", ""));

    let final_state = wizard.run(inbox).await;

    assert_eq!(final_state.step, WizardStep::Done);
    assert_eq!(snapshots.borrow().step, WizardStep::Done);
    assert!(!events.bridge(BridgeEvent::Closed), "inbox closed after done");
}
