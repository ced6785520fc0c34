//! # Honey Store order backend
//! This crate hosts the HTTP server for the Honey Store order backend. It is responsible for:
//! * Taking orders from the storefront and storing them as `pending`.
//! * Submitting each order's payment to the payment gateway in the background.
//! * Receiving the gateway's settlement webhooks and updating the order's payment status.
//! * Retrying failed payments on request, and failing payments that never settle.
//! * Pushing order changes and request logs to the admin dashboard over a WebSocket.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: Health check, including whether the database is reachable.
//! * `/ws`: The live status push channel.
//! * `/api/connection-info`: How the backend is connected, and whether it can receive webhooks.
//! * `/api/orders`: List (`GET`), create (`POST`) and clear (`DELETE`) orders.
//! * `/api/orders/{id}`: Fetch a single order.
//! * `/api/orders/{id}/retry-payment`: Retry a rejected or failed payment.
//! * `/api/webhook/payment`: Settlement webhooks from the payment gateway.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod gateway_client;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod sweep_worker;
