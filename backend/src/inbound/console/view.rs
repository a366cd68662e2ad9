//! Plain-text rendering of wizard snapshots.

use std::fmt::{self, Write};

use crate::domain::{WizardState, WizardStep};

/// Page heading.
pub const TITLE: &str = "FastPass Employment & Income Verification";
/// Line under the heading.
pub const TAGLINE: &str = "Secure, instant proof of employment for lending. \
     Connect, preview, pay, and send to lender, all in one step.";

/// Sandbox login accepted by the provider's test environment.
pub const SANDBOX_USERNAME: &str = "goodlogin";
/// Sandbox password accepted by the provider's test environment.
pub const SANDBOX_PASSWORD: &str = "goodpassword";
/// Sandbox SSN accepted by the provider's test environment.
pub const SANDBOX_SSN: &str = "991-91-9991";

/// Render the whole screen for a snapshot.
///
/// # Examples
/// ```
/// use fastpass::domain::WizardState;
/// use fastpass::inbound::console::view::render;
///
/// let screen = render(&WizardState::default());
/// assert!(screen.contains("Connect Payroll"));
/// ```
pub fn render(state: &WizardState) -> String {
    Screen(state).to_string()
}

/// One snapshot laid out for the terminal.
struct Screen<'a>(&'a WizardState);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        writeln!(out, "{TITLE}")?;
        writeln!(out, "{TAGLINE}")?;
        writeln!(out, "[step {} of 4]", state.step.number())?;
        writeln!(out)?;

        match state.step {
            WizardStep::Start => render_start(out, state)?,
            WizardStep::Bridge => render_bridge(out)?,
            WizardStep::Pay => render_pay(out, state)?,
            WizardStep::Done => render_done(out, state)?,
        }

        if let Some(error) = &state.error {
            writeln!(out)?;
            writeln!(out, "! {error}")?;
        }
        Ok(())
    }
}

fn render_start(out: &mut impl Write, state: &WizardState) -> fmt::Result {
    writeln!(out, "Borrower Full Name, then Loan Application ID (optional).")?;
    if state.loading {
        writeln!(out, "Connecting...")
    } else {
        writeln!(out, "Press Enter after each field to Connect Payroll.")
    }
}

fn render_bridge(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "Truv Bridge Opened")?;
    writeln!(out, "Follow the bridge instructions. Use Truv sandbox credentials:")?;
    writeln!(out, "  Username: {SANDBOX_USERNAME}")?;
    writeln!(out, "  Password: {SANDBOX_PASSWORD}")?;
    writeln!(out, "  SSN: {SANDBOX_SSN}")?;
    writeln!(out, "When done, you'll see a data preview and payment step.")
}

fn render_pay(out: &mut impl Write, state: &WizardState) -> fmt::Result {
    writeln!(out, "Data Verified")?;
    writeln!(
        out,
        "Review your verified employment/income info. Pay to deliver to lender."
    )?;
    if let Some(report) = &state.report {
        writeln!(out, "{}", report.verified_data.pretty())?;
    }
    if state.loading {
        writeln!(out, "Processing payment...")?;
    }
    Ok(())
}

fn render_done(out: &mut impl Write, state: &WizardState) -> fmt::Result {
    writeln!(out, "Payment Complete")?;
    writeln!(out, "Your verified report has been delivered to your lender!")?;
    if let Some(capture) = state.report.as_ref().and_then(|report| report.payment.as_ref()) {
        writeln!(out, "{}", capture.pretty())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use serde_json::json;

    use crate::domain::{
        BorrowerIdentity, LinkId, PaymentCapture, VerificationPayload, VerifiedReport,
        WizardError,
    };

    #[fixture]
    fn report() -> VerifiedReport {
        VerifiedReport {
            borrower_name: "Jane Doe".to_owned(),
            application_id: None,
            verified_at: Utc.timestamp_millis_opt(0).single().expect("valid time"),
            verified_data: VerificationPayload::new(json!({
                "employments": [{ "company": { "name": "Facebook Demo" } }]
            })),
            link_id: LinkId::new("link-1"),
            payment: None,
        }
    }

    #[test]
    fn start_screen_shows_title_and_prompt() {
        let screen = render(&WizardState::default());
        assert!(screen.starts_with(TITLE));
        assert!(screen.contains("[step 1 of 4]"));
        assert!(screen.contains("Connect Payroll"));
    }

    #[test]
    fn loading_start_screen_says_connecting() {
        let state = WizardState {
            loading: true,
            ..WizardState::default()
        };
        assert!(render(&state).contains("Connecting..."));
    }

    #[test]
    fn bridge_screen_lists_sandbox_credentials() {
        let state = WizardState {
            step: WizardStep::Bridge,
            borrower: BorrowerIdentity::new("Jane Doe", "").ok(),
            ..WizardState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("Truv Bridge Opened"));
        for credential in [SANDBOX_USERNAME, SANDBOX_PASSWORD, SANDBOX_SSN] {
            assert!(screen.contains(credential), "missing {credential}");
        }
    }

    #[rstest]
    fn pay_screen_previews_the_payload(report: VerifiedReport) {
        let state = WizardState {
            step: WizardStep::Pay,
            report: Some(report),
            ..WizardState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("Data Verified"));
        assert!(screen.contains("\"name\": \"Facebook Demo\""));
    }

    #[rstest]
    fn done_screen_prints_the_capture(mut report: VerifiedReport) {
        report.payment = Some(PaymentCapture::new(json!({ "status": "COMPLETED" })));
        let state = WizardState {
            step: WizardStep::Done,
            report: Some(report),
            ..WizardState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("Payment Complete"));
        assert!(screen.contains("\"status\": \"COMPLETED\""));
    }

    #[test]
    fn loading_pay_screen_says_processing() {
        let state = WizardState {
            step: WizardStep::Pay,
            loading: true,
            ..WizardState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("[step 3 of 4]"));
        assert!(screen.ends_with("Processing payment...\n"));
    }

    #[test]
    fn errors_are_shown_below_the_body() {
        let state = WizardState {
            error: Some(WizardError::EmptyBorrowerName),
            ..WizardState::default()
        };
        assert!(render(&state).ends_with("! Please enter the borrower's name.\n"));
    }
}
