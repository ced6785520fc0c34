//! # Honey Store payment simulator
//! A stand-in for a real payment gateway. It accepts every payment straight away and settles it asynchronously:
//! once the requested delay has elapsed, an `approved` or `rejected` webhook is posted back to the order backend,
//! depending on the admin dashboard's `simulatePaymentError` switch at that moment.
//!
//! If the webhook cannot be delivered and the simulator is port forwarded, a single `error` report is sent to the
//! alternative backend address. Otherwise the settlement is lost.
//!
//! ## Routes
//! * `/health`: Health check.
//! * `/ws`: The live status push channel.
//! * `/api/payment`: Accept a payment.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod gateway;
pub mod routes;
pub mod server;
pub mod webhook_sender;

#[cfg(test)]
mod test_utils;
