mod common;

use common::{Backend, valid_buyer};
use pix_checkout::application::checkout::Checkout;
use pix_checkout::application::scheduler::SessionEnd;
use pix_checkout::config::{CheckoutConfig, PollingConfig};
use pix_checkout::domain::ports::{StatusDisplay, Step};
use pix_checkout::domain::state::PaymentState;
use pix_checkout::infrastructure::http::HttpPaymentGateway;
use pix_checkout::infrastructure::in_memory::{RecordingView, ViewEvent};
use std::sync::Arc;
use std::time::Duration;

fn fast_config(base_url: String) -> CheckoutConfig {
    CheckoutConfig {
        base_url,
        polling: PollingConfig {
            interval: Duration::from_millis(50),
            timeout: Duration::from_secs(2),
        },
        ..CheckoutConfig::default()
    }
}

async fn checkout_against(backend: &Backend) -> (Checkout, Arc<RecordingView>) {
    let config = fast_config(backend.spawn().await);
    let gateway = Arc::new(HttpPaymentGateway::new(&config).unwrap());
    let view = Arc::new(RecordingView::new());
    (Checkout::new(gateway, view.clone(), &config), view)
}

#[tokio::test]
async fn test_http_checkout_reaches_approval() {
    let backend = Backend::default();
    backend.queue_statuses(&["pending", "waiting_payment", "approved"]);
    let (checkout, view) = checkout_against(&backend).await;

    let session = checkout.submit(valid_buyer()).await.unwrap();
    assert_eq!(session.order_id(), "41");
    assert_eq!(
        session.finished().await,
        SessionEnd::Completed(PaymentState::Approved)
    );

    assert_eq!(view.successes(), 1);
    assert!(view.events().contains(&ViewEvent::Step(Step::Qr)));
    assert!(backend.status_polls() >= 3);
}

#[tokio::test]
async fn test_http_checkout_reports_expiry() {
    let backend = Backend::default();
    backend.queue_statuses(&["pending", "expired"]);
    let (checkout, view) = checkout_against(&backend).await;

    let session = checkout.submit(valid_buyer()).await.unwrap();
    assert_eq!(
        session.finished().await,
        SessionEnd::Completed(PaymentState::Expired)
    );
    assert_eq!(view.last_status(), Some(StatusDisplay::Expired));
    assert_eq!(view.successes(), 0);
}

#[tokio::test]
async fn test_http_checkout_times_out_quietly_polling() {
    let backend = Backend::default();
    let (checkout, view) = checkout_against(&backend).await;

    let session = checkout.submit(valid_buyer()).await.unwrap();
    assert_eq!(session.finished().await, SessionEnd::TimedOut);
    assert_eq!(view.last_status(), Some(StatusDisplay::TimedOut));

    // Let any request issued just before the deadline land first.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let polls = backend.status_polls();
    assert!(polls > 0);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(backend.status_polls(), polls);
}
