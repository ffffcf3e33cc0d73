//! Application layer orchestrating a checkout.
//!
//! `Checkout` gates submission and creates the charge, `PollingScheduler` owns
//! the single active polling session as an actor-like task fed over `tokio`
//! channels, and `PaymentStateMachine` decides when a session is over.

pub mod checkout;
pub mod scheduler;
pub mod state_machine;
