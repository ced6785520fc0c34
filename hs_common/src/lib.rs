//! # Honey Store common types
//!
//! Types and plumbing shared by the order backend (`honey_store_server`) and the payment gateway simulator
//! (`payment_simulator`):
//!
//! * [`payment`] holds the wire types that travel between the two services: payment requests, the gateway's
//!   acceptance response and the webhook payloads (in both accepted shapes).
//! * [`admin`] and [`service_status`] hold the process-wide, volatile observability state.
//! * [`connection`] resolves callback addresses for each connectivity mode.
//! * [`tasks`] is the fire-and-forget background task abstraction.
//! * [`live`] is the live status broadcaster that pushes events to dashboard observers.
//! * [`routing`] provides the `route!` macro for mounting generic actix handlers.
pub mod admin;
pub mod connection;
pub mod helpers;
pub mod live;
pub mod payment;
pub mod routing;
pub mod service_status;
pub mod tasks;

pub use admin::{AdminConfig, AdminConfigUpdate};
pub use connection::{CallbackEndpoints, CallbackRoute, CallbackStrategy, ConnectionMethod, ServiceLocation};
pub use payment::{
    GatewayStatus,
    PaymentData,
    PaymentRequest,
    PaymentResponse,
    PaymentStatus,
    PaymentWebhook,
    SettlementStatus,
    WebhookPayload,
    WebhookPayloadError,
};
pub use service_status::{RequestLog, ServiceStatus};
pub use tasks::{BoxedTask, QueuedTaskRunner, TaskRunner, TokioTaskRunner};
