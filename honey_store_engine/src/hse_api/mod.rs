//! The public API of the order engine.
pub mod dispatcher;
pub mod errors;
pub mod order_flow_api;
pub mod webhook_policy;
