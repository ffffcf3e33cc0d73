use crate::application::state_machine::{Effect, PaymentStateMachine};
use crate::config::PollingConfig;
use crate::domain::ports::{SharedGateway, SharedView, StatusDisplay};
use crate::domain::state::PaymentState;
use crate::domain::status::PaymentStatus;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Identity of one polling session. Every status update carries the id of
/// the session that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed(PaymentState),
    TimedOut,
    Cancelled,
}

/// A status answer tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub session: SessionId,
    pub status: PaymentStatus,
}

/// What happened to a delivered update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The update belongs to a session that is no longer active.
    Stale,
    Applied(Effect),
}

/// Caller-side handle of a polling session.
#[derive(Debug, Clone)]
pub struct PollingSession {
    id: SessionId,
    order_id: String,
    started_at: Instant,
    active: Arc<AtomicBool>,
    end: watch::Receiver<Option<SessionEnd>>,
}

impl PollingSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Resolves once the session has stopped, for whatever reason.
    pub async fn finished(&self) -> SessionEnd {
        let mut end = self.end.clone();
        let outcome = match end.wait_for(Option::is_some).await {
            Ok(value) => *value,
            Err(_) => None,
        };
        outcome.unwrap_or(SessionEnd::Cancelled)
    }
}

struct ActiveSession {
    id: SessionId,
    order_id: String,
    machine: PaymentStateMachine,
    active: Arc<AtomicBool>,
    end: watch::Sender<Option<SessionEnd>>,
    task: Option<JoinHandle<()>>,
}

impl ActiveSession {
    fn finish(self, outcome: SessionEnd) {
        self.active.store(false, Ordering::SeqCst);
        self.end.send_replace(Some(outcome));
    }

    fn abort(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.finish(SessionEnd::Cancelled);
    }
}

struct Shared {
    gateway: SharedGateway,
    view: SharedView,
    polling: PollingConfig,
    access_url: String,
    next_id: AtomicU64,
    active: Mutex<Option<ActiveSession>>,
}

/// Owns the single active polling session.
///
/// Starting a session cancels whichever one was running. Each session runs as
/// its own task: a timer fires a status check every interval, each check runs
/// detached so a slow answer never delays the next tick, and answers come back
/// over a channel tagged with the session id. Updates are applied under the
/// session lock only if their id is still the active one.
#[derive(Clone)]
pub struct PollingScheduler {
    shared: Arc<Shared>,
}

impl PollingScheduler {
    pub fn new(
        gateway: SharedGateway,
        view: SharedView,
        polling: PollingConfig,
        access_url: impl Into<String>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                gateway,
                view,
                polling,
                access_url: access_url.into(),
                next_id: AtomicU64::new(0),
                active: Mutex::new(None),
            }),
        }
    }

    pub async fn start(&self, order_id: impl Into<String>) -> PollingSession {
        let order_id = order_id.into();
        let mut slot = self.shared.active.lock().await;

        if let Some(previous) = slot.take() {
            info!(session = %previous.id, order_id = %previous.order_id, "cancelling superseded polling session");
            previous.abort();
        }

        let id = SessionId(self.shared.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let started_at = Instant::now();
        let active = Arc::new(AtomicBool::new(true));
        let (end_tx, end_rx) = watch::channel(None);

        let task = tokio::spawn(run_session(
            self.shared.clone(),
            id,
            order_id.clone(),
            started_at,
            active.clone(),
        ));

        info!(session = %id, order_id = %order_id, "polling session started");
        *slot = Some(ActiveSession {
            id,
            order_id: order_id.clone(),
            machine: PaymentStateMachine::new(),
            active: active.clone(),
            end: end_tx,
            task: Some(task),
        });

        PollingSession {
            id,
            order_id,
            started_at,
            active,
            end: end_rx,
        }
    }

    /// Stops `session` if it is still the active one. Safe to call repeatedly.
    pub async fn cancel(&self, session: &PollingSession) {
        let mut slot = self.shared.active.lock().await;
        if slot.as_ref().is_some_and(|s| s.id == session.id)
            && let Some(current) = slot.take()
        {
            info!(session = %current.id, "polling session cancelled");
            current.abort();
        }
    }

    /// Stops whatever session is running, if any.
    pub async fn cancel_active(&self) {
        if let Some(current) = self.shared.active.lock().await.take() {
            info!(session = %current.id, "polling session cancelled");
            current.abort();
        }
    }

    pub async fn active_session(&self) -> Option<SessionId> {
        self.shared.active.lock().await.as_ref().map(|s| s.id)
    }

    /// Applies one status update if it belongs to the active session.
    pub async fn handle_update(&self, update: StatusUpdate) -> TickOutcome {
        self.shared.handle_update(update).await
    }
}

impl Shared {
    async fn handle_update(&self, update: StatusUpdate) -> TickOutcome {
        let mut slot = self.active.lock().await;
        let Some(current) = slot.as_mut().filter(|s| s.id == update.session) else {
            debug!(session = %update.session, status = %update.status, "discarding update for inactive session");
            return TickOutcome::Stale;
        };

        if let PaymentStatus::Unrecognized(raw) = &update.status {
            warn!(session = %current.id, status = %raw, "unrecognized payment status, still waiting");
        }

        // A terminal session is removed from the slot, so this always yields.
        let Some(effect) = current.machine.apply(&update.status) else {
            return TickOutcome::Stale;
        };
        self.render(effect);

        if current.machine.is_terminal() {
            let state = current.machine.state();
            if let Some(done) = slot.take() {
                info!(session = %done.id, order_id = %done.order_id, ?state, "payment reached a terminal state");
                done.finish(SessionEnd::Completed(state));
            }
        }
        TickOutcome::Applied(effect)
    }

    async fn expire(&self, id: SessionId) {
        let mut slot = self.active.lock().await;
        if !slot.as_ref().is_some_and(|s| s.id == id) {
            return;
        }
        if let Some(mut current) = slot.take() {
            if let Some(effect) = current.machine.time_out() {
                self.render(effect);
            }
            info!(session = %id, order_id = %current.order_id, "polling ceiling reached without a final status");
            current.finish(SessionEnd::TimedOut);
        }
    }

    fn render(&self, effect: Effect) {
        match effect {
            Effect::Status(display) | Effect::Failure(display) => self.view.show_status(display),
            Effect::Success => {
                self.view.show_status(StatusDisplay::Approved);
                self.view.show_success(&self.access_url);
            }
        }
    }
}

async fn run_session(
    shared: Arc<Shared>,
    id: SessionId,
    order_id: String,
    started_at: Instant,
    active: Arc<AtomicBool>,
) {
    let period = shared.polling.interval;
    let schedule = match (
        started_at.checked_add(period),
        started_at.checked_add(shared.polling.timeout),
    ) {
        (Some(first_tick), Some(deadline)) if !period.is_zero() => Some((first_tick, deadline)),
        _ => None,
    };
    let Some((first_tick, deadline)) = schedule else {
        warn!(session = %id, polling = ?shared.polling, "polling window cannot be scheduled, ending session");
        shared.expire(id).await;
        return;
    };

    let mut ticker = time::interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let deadline = time::sleep_until(deadline);
    tokio::pin!(deadline);

    let (updates_tx, mut updates_rx) = mpsc::unbounded_channel::<StatusUpdate>();

    while active.load(Ordering::SeqCst) {
        tokio::select! {
            biased;
            _ = &mut deadline => {
                shared.expire(id).await;
                break;
            }
            Some(update) = updates_rx.recv() => {
                shared.handle_update(update).await;
            }
            _ = ticker.tick() => {
                if !active.load(Ordering::SeqCst) {
                    break;
                }
                debug!(session = %id, order_id = %order_id, "checking payment status");
                let gateway = shared.gateway.clone();
                let updates_tx = updates_tx.clone();
                let order_id = order_id.clone();
                tokio::spawn(async move {
                    match gateway.get_status(&order_id).await {
                        Ok(status) => {
                            // The receiver is gone once the session has ended.
                            let _ = updates_tx.send(StatusUpdate { session: id, status });
                        }
                        Err(err) => {
                            warn!(session = %id, order_id = %order_id, error = %err, "status check failed, retrying on next tick");
                        }
                    }
                });
            }
        }
    }

    debug!(session = %id, "polling loop exited");
}
