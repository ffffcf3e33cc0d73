//! Domain types and rules for a PIX checkout, free of I/O.
//!
//! The `ports` module defines the seams (`PaymentGateway`, `CheckoutView`)
//! that the application layer drives and the infrastructure layer fills in.

pub mod buyer;
pub mod charge;
pub mod ports;
pub mod state;
pub mod status;
pub mod validation;
