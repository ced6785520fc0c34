use std::fmt::Display;

use honey_store_engine::db_types::{Order, OrderId, PaymentStatus};
use hs_common::{ConnectionMethod, ServiceLocation};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub message: String,
}

impl JsonResponse {
    pub fn new<S: Display>(message: S) -> Self {
        Self { message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub location: ServiceLocation,
    pub connection_method: ConnectionMethod,
    pub database: String,
}

/// How the backend is connected, as reported on `/api/connection-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub connection_method: ConnectionMethod,
    pub service_location: ServiceLocation,
    pub can_receive_webhooks: bool,
    pub webhook_url: String,
}

impl ConnectionInfo {
    pub fn from_config(config: &ServerConfig) -> Self {
        let can_receive_webhooks = config.connection_method.can_receive_webhooks();
        let webhook_url = if can_receive_webhooks { config.callback_url() } else { "Not available".to_string() };
        Self {
            connection_method: config.connection_method,
            service_location: config.location,
            can_receive_webhooks,
            webhook_url,
        }
    }

    pub fn summary(&self) -> ConnectionSummary {
        ConnectionSummary {
            method: self.connection_method,
            location: self.service_location,
            can_receive_webhooks: self.can_receive_webhooks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSummary {
    pub method: ConnectionMethod,
    pub location: ServiceLocation,
    pub can_receive_webhooks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub connection_info: ConnectionSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersCleared {
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryStarted {
    pub message: String,
    pub order_id: OrderId,
    pub status: PaymentStatus,
}
