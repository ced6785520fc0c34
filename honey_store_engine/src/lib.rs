//! Honey Store Engine
//!
//! The order side of the Honey Store payment demo. This library holds the Order Store and the Order-Payment
//! Orchestrator. It has no HTTP server code; `honey_store_server` exposes it over HTTP.
//!
//! The library is divided into two main sections:
//! 1. Order storage ([`mod@db`]). SQLite is the supported backend. Backends implement [`OrderManagement`]. The data
//!    types stored in the database are defined in [`db_types`].
//! 2. The order flow API ([`OrderFlowApi`]). It creates orders, submits their payments to the gateway in the
//!    background through a [`PaymentDispatcher`], applies settlement webhooks, and handles retries and stale payments.
//!
//! Every change to an order's payment status is emitted as an event. Hook into these with [`events::EventHooks`].
mod db;

pub mod db_types;
pub mod events;
mod hse_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::OrderManagement;
pub use hse_api::{
    dispatcher::{DispatchError, PaymentDispatcher},
    errors::OrderFlowError,
    order_flow_api::{FlowOptions, OrderFlowApi},
    webhook_policy::WebhookPolicy,
};
