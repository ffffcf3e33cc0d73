use crate::domain::buyer::BuyerInfo;
use crate::domain::charge::ChargeResult;
use crate::domain::ports::{CheckoutView, PaymentGateway, StatusDisplay, Step};
use crate::domain::status::PaymentStatus;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;

pub const DEMO_PIX_CODE: &str =
    "00020126580014br.gov.bcb.pix0136123e4567-e12b-12d1-a456-4266554400005204000053039865802BR5913PIX CHECKOUT6009SAO PAULO62070503***6304ABCD";

/// How the in-memory gateway answers charge creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeScript {
    Issue {
        qr_image: Option<String>,
        qr_text: Option<String>,
    },
    /// The service answers `success: false` with this message.
    Reject(String),
    /// The service cannot be reached.
    Unreachable,
}

impl Default for ChargeScript {
    fn default() -> Self {
        ChargeScript::Issue {
            qr_image: None,
            qr_text: Some(DEMO_PIX_CODE.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
enum ScriptedPoll {
    Status(PaymentStatus),
    Fail(String),
}

#[derive(Debug, Default)]
struct GatewayState {
    charge: ChargeScript,
    next_order: u64,
    buyers: Vec<BuyerInfo>,
    scripts: HashMap<String, VecDeque<ScriptedPoll>>,
    default_script: Vec<ScriptedPoll>,
    last_status: HashMap<String, PaymentStatus>,
    status_calls: HashMap<String, usize>,
    status_delay: Duration,
}

/// A scripted stand-in for the remote payment service.
///
/// Orders are numbered from 1. Status polls consume the script queued for an
/// order (or the default script, for orders without one); once it runs dry the
/// last delivered status repeats, starting from `pending`. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryGateway {
    state: Arc<RwLock<GatewayState>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Approves every order after `polls` pending answers.
    pub async fn approving_after(polls: usize) -> Self {
        let gateway = Self::new();
        let mut script = vec![ScriptedPoll::Status(PaymentStatus::Pending); polls];
        script.push(ScriptedPoll::Status(PaymentStatus::Paid));
        gateway.state.write().await.default_script = script;
        gateway
    }

    pub async fn set_charge_script(&self, script: ChargeScript) {
        self.state.write().await.charge = script;
    }

    pub async fn script_statuses<I, S>(&self, order_id: &str, statuses: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.state.write().await;
        let queue = state.scripts.entry(order_id.to_string()).or_default();
        queue.extend(
            statuses
                .into_iter()
                .map(|s| ScriptedPoll::Status(PaymentStatus::from(s.as_ref()))),
        );
    }

    /// Queues a transport failure for the next poll of `order_id`.
    pub async fn fail_next_poll(&self, order_id: &str, message: &str) {
        let mut state = self.state.write().await;
        state
            .scripts
            .entry(order_id.to_string())
            .or_default()
            .push_back(ScriptedPoll::Fail(message.to_string()));
    }

    /// Every status answer is delayed by this much.
    pub async fn set_status_delay(&self, delay: Duration) {
        self.state.write().await.status_delay = delay;
    }

    pub async fn status_calls(&self, order_id: &str) -> usize {
        let state = self.state.read().await;
        state.status_calls.get(order_id).copied().unwrap_or(0)
    }

    pub async fn buyers(&self) -> Vec<BuyerInfo> {
        self.state.read().await.buyers.clone()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryGateway {
    async fn create_charge(&self, buyer: &BuyerInfo) -> Result<ChargeResult> {
        let mut state = self.state.write().await;
        let script = state.charge.clone();
        match script {
            ChargeScript::Unreachable => Err(CheckoutError::Network("connection refused".into())),
            ChargeScript::Reject(message) => Err(CheckoutError::Service(message)),
            ChargeScript::Issue { qr_image, qr_text } => {
                state.next_order += 1;
                state.buyers.push(buyer.clone());
                let order_id = state.next_order.to_string();
                Ok(ChargeResult::new(order_id, qr_image, qr_text)?.with_amount_cents(Some(1990)))
            }
        }
    }

    async fn get_status(&self, order_id: &str) -> Result<PaymentStatus> {
        let (poll, delay) = {
            let mut state = self.state.write().await;
            *state.status_calls.entry(order_id.to_string()).or_default() += 1;
            if !state.scripts.contains_key(order_id) {
                let script = state.default_script.iter().cloned().collect();
                state.scripts.insert(order_id.to_string(), script);
            }
            let next = state
                .scripts
                .get_mut(order_id)
                .and_then(VecDeque::pop_front);
            let poll = match next {
                Some(poll) => poll,
                None => ScriptedPoll::Status(
                    state
                        .last_status
                        .get(order_id)
                        .cloned()
                        .unwrap_or(PaymentStatus::Pending),
                ),
            };
            if let ScriptedPoll::Status(status) = &poll {
                state.last_status.insert(order_id.to_string(), status.clone());
            }
            (poll, state.status_delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match poll {
            ScriptedPoll::Status(status) => Ok(status),
            ScriptedPoll::Fail(message) => Err(CheckoutError::Network(message)),
        }
    }
}

/// Something the checkout asked the view to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Step(Step),
    Error(String),
    Charge(String),
    Status(StatusDisplay),
    Success(String),
}

/// A view that records every call, for tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, predicate: impl Fn(&ViewEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| predicate(*e))
            .count()
    }

    pub fn successes(&self) -> usize {
        self.count(|e| matches!(e, ViewEvent::Success(_)))
    }

    pub fn last_status(&self) -> Option<StatusDisplay> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Status(display) => Some(display),
            _ => None,
        })
    }

    pub fn last_step(&self) -> Option<Step> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Step(step) => Some(step),
            ViewEvent::Error(_) => Some(Step::Error),
            _ => None,
        })
    }

    fn push(&self, event: ViewEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl CheckoutView for RecordingView {
    fn show_step(&self, step: Step) {
        self.push(ViewEvent::Step(step));
    }

    fn show_error(&self, message: &str) {
        self.push(ViewEvent::Error(message.to_string()));
    }

    fn show_charge(&self, charge: &ChargeResult) {
        self.push(ViewEvent::Charge(charge.order_id.clone()));
    }

    fn show_status(&self, display: StatusDisplay) {
        self.push(ViewEvent::Status(display));
    }

    fn show_success(&self, access_url: &str) {
        self.push(ViewEvent::Success(access_url.to_string()));
    }
}
