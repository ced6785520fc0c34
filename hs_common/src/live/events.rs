use serde::{Deserialize, Serialize};

use crate::{AdminConfig, AdminConfigUpdate, PaymentWebhook, RequestLog, ServiceStatus};

/// Events pushed to live observers. On the wire each event is a JSON text frame of the form
/// `{"event": "<name>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum LiveEvent {
    ServiceStatus(ServiceStatus),
    AdminConfig(AdminConfig),
    RequestLog(RequestLog),
    /// The whole request log buffer, oldest first. Only sent as part of the snapshot on connect.
    RequestLogs(Vec<RequestLog>),
    /// The full order record, as returned by the order API
    OrderUpdated(serde_json::Value),
    PaymentWebhook(PaymentWebhook),
}

impl LiveEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LiveEvent::ServiceStatus(_) => "service-status",
            LiveEvent::AdminConfig(_) => "admin-config",
            LiveEvent::RequestLog(_) => "request-log",
            LiveEvent::RequestLogs(_) => "request-logs",
            LiveEvent::OrderUpdated(_) => "order-updated",
            LiveEvent::PaymentWebhook(_) => "payment-webhook",
        }
    }
}

/// Events sent by dashboard clients over the push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    UpdateAdminConfig(AdminConfigUpdate),
}
