//! Interactive borrower wizard: connect payroll, preview, pay, deliver.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fastpass::domain::{Wizard, WizardEvents, WizardPorts, WizardState, WizardStep};
use fastpass::inbound::console::view::render;
use fastpass::inbound::console::{ConsolePrompt, WizardSettings};
use fastpass::outbound::console_bridge::ConsoleBridgeWidget;
use fastpass::outbound::paypal::PayPalCheckout;
use fastpass::outbound::relay_client::RelayHttpClient;

const NAME_PROMPT: &str = "Borrower Full Name:";
const APPLICATION_PROMPT: &str = "Loan Application ID (optional):";
const STALLED_HINT: &str = "Press Ctrl-C to quit and start over.";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = WizardSettings::load().map_err(|e| eyre!("load wizard settings: {e}"))?;
    let prompt = ConsolePrompt::stdin();
    let relay = RelayHttpClient::new(settings.relay_url()?, settings.timeout())
        .wrap_err("build relay client")?;
    let checkout = PayPalCheckout::new(settings.paypal_settings()?, prompt.clone())
        .wrap_err("build payment checkout")?;
    let ports = WizardPorts {
        relay: Arc::new(relay),
        bridge: Arc::new(ConsoleBridgeWidget::new(prompt.clone())),
        checkout: Arc::new(checkout),
        clock: Arc::new(DefaultClock),
    };

    let (events, inbox) = WizardEvents::channel();
    let (wizard, snapshots) = Wizard::new(ports, settings.order()?, events.clone());
    let driver = tokio::spawn(wizard.run(inbox));
    let screen = tokio::spawn(show_snapshots(snapshots.clone()));

    tokio::select! {
        outcome = collect_start_form(&prompt, &events, snapshots) => outcome?,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            return Ok(());
        }
    }

    tokio::select! {
        finished = driver => {
            let state = finished.wrap_err("wizard task panicked")?;
            info!(step = ?state.step, "wizard finished");
        }
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }
    screen.abort();
    Ok(())
}

/// Ask for the borrower until the bridge opens or input ends.
async fn collect_start_form(
    prompt: &ConsolePrompt,
    events: &WizardEvents,
    mut snapshots: watch::Receiver<WizardState>,
) -> Result<()> {
    loop {
        let Some(name) = prompt.ask(NAME_PROMPT).await? else {
            return Err(eyre!("input closed before the borrower was entered"));
        };
        let application_id = prompt.ask(APPLICATION_PROMPT).await?.unwrap_or_default();

        snapshots.mark_unchanged();
        if !events.connect(name, application_id) {
            return Err(eyre!("wizard stopped unexpectedly"));
        }
        snapshots
            .changed()
            .await
            .wrap_err("wizard stopped unexpectedly")?;
        let settled = snapshots
            .wait_for(|state| !state.loading)
            .await
            .wrap_err("wizard stopped unexpectedly")?;
        if settled.step != WizardStep::Start {
            return Ok(());
        }
    }
}

/// Redraw the screen whenever the wizard publishes a new snapshot.
async fn show_snapshots(mut snapshots: watch::Receiver<WizardState>) {
    println!("{}", render(&snapshots.borrow_and_update()));
    while snapshots.changed().await.is_ok() {
        let state = snapshots.borrow_and_update().clone();
        println!("{}", render(&state));
        if stalled(&state) {
            println!("{STALLED_HINT}");
        }
    }
}

/// No console adapter is waiting for input once a later step has failed.
fn stalled(state: &WizardState) -> bool {
    !state.loading && state.error.is_some() && state.step != WizardStep::Start
}
