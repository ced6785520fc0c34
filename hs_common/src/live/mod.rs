//! The live status broadcaster.
//!
//! [`LiveMonitor`] owns a service's volatile observability state and fans changes out to connected observers.
//! [`live_session`] attaches a WebSocket client to a monitor, and [`AccessLogMiddlewareFactory`] feeds the request log
//! from an actix-web app.
mod access_log;
mod events;
mod monitor;
mod socket;

pub use access_log::{AccessLogMiddlewareFactory, AccessLogMiddlewareService, EXTERNAL_SOURCE, REQUEST_SOURCE_HEADER};
pub use events::{ClientEvent, LiveEvent};
pub use monitor::{LiveMonitor, MonitorError, LIVE_CHANNEL_CAPACITY, REQUEST_LOG_CAPACITY};
pub use socket::{decode_client_event, live_session};
