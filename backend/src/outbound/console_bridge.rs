//! Terminal stand-in for the provider's bridge widget.
//!
//! Prints the bridge token and sandbox credentials, then waits for the
//! operator to paste the public token the hosted bridge reports.

use tokio::runtime::Handle;
use tracing::debug;

use crate::domain::ports::{BridgeWidget, BridgeWidgetError};
use crate::domain::{BridgeEvent, BridgeToken, PublicToken, WizardEvents};
use crate::inbound::console::ConsolePrompt;
use crate::inbound::console::view::{SANDBOX_PASSWORD, SANDBOX_SSN, SANDBOX_USERNAME};

const TOKEN_PROMPT: &str =
    "Paste the public token from Truv Bridge (or 'error: <reason>', or 'cancel'):";

/// Bridge widget driven from the terminal.
#[derive(Clone)]
pub struct ConsoleBridgeWidget {
    prompt: ConsolePrompt,
}

impl ConsoleBridgeWidget {
    /// Read bridge outcomes from `prompt`.
    pub fn new(prompt: ConsolePrompt) -> Self {
        Self { prompt }
    }
}

impl BridgeWidget for ConsoleBridgeWidget {
    fn open(&self, token: &BridgeToken, events: WizardEvents) -> Result<(), BridgeWidgetError> {
        let runtime = Handle::try_current().map_err(|_| BridgeWidgetError::unavailable())?;
        println!("Open Truv Bridge with bridge token: {token}");
        println!(
            "Sandbox login: {SANDBOX_USERNAME} / {SANDBOX_PASSWORD} (SSN {SANDBOX_SSN})"
        );
        let prompt = self.prompt.clone();
        runtime.spawn(async move {
            let outcome = read_outcome(&prompt).await;
            debug!(?outcome, "bridge outcome read from terminal");
            events.bridge(outcome);
        });
        Ok(())
    }
}

async fn read_outcome(prompt: &ConsolePrompt) -> BridgeEvent {
    loop {
        let line = match prompt.ask(TOKEN_PROMPT).await {
            Ok(Some(line)) => line,
            Ok(None) => return BridgeEvent::Closed,
            Err(error) => {
                return BridgeEvent::Error {
                    message: error.to_string(),
                };
            }
        };
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("cancel") {
            return BridgeEvent::Closed;
        }
        return match line.strip_prefix("error:") {
            Some(reason) => BridgeEvent::Error {
                message: reason.trim().to_owned(),
            },
            None => BridgeEvent::Success {
                public_token: PublicToken::new(line),
            },
        };
    }
}
