use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use pix_checkout::application::checkout::Checkout;
use pix_checkout::application::scheduler::SessionEnd;
use pix_checkout::domain::ports::{SharedGateway, SharedView};
use pix_checkout::domain::state::PaymentState;
use pix_checkout::infrastructure::http::HttpPaymentGateway;
use pix_checkout::infrastructure::in_memory::InMemoryGateway;
use pix_checkout::interfaces::cli::Cli;
use pix_checkout::interfaces::terminal::TerminalView;
use pix_checkout::logging;
use std::sync::Arc;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);

    let config = cli.config();
    config.validate().into_diagnostic()?;

    let mut simulator = None;
    let gateway: SharedGateway = if cli.demo {
        Arc::new(InMemoryGateway::approving_after(2).await)
    } else {
        let http = HttpPaymentGateway::new(&config).into_diagnostic()?;
        if cli.simulate {
            simulator = Some(http.clone());
        }
        Arc::new(http)
    };
    let view: SharedView = Arc::new(TerminalView::stdout());

    let checkout = Checkout::new(gateway, view, &config);
    checkout.open().await;

    // Errors have already been shown on the error step.
    let session = checkout.submit(cli.buyer()).await.into_diagnostic()?;

    if let Some(http) = simulator
        && let Err(e) = http.simulate_payment(session.order_id()).await
    {
        warn!(error = %e, "payment simulation failed, waiting for a real payment");
    }

    let outcome = tokio::select! {
        outcome = session.finished() => outcome,
        _ = tokio::signal::ctrl_c() => {
            checkout.close().await;
            SessionEnd::Cancelled
        }
    };

    match outcome {
        SessionEnd::Completed(PaymentState::Approved) => Ok(()),
        SessionEnd::Completed(state) => Err(miette!("payment was not completed: {state:?}")),
        SessionEnd::TimedOut => Err(miette!("no payment confirmation received in time")),
        SessionEnd::Cancelled => Err(miette!("checkout cancelled")),
    }
}
