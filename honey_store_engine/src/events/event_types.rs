use hs_common::PaymentWebhook;
use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Emitted whenever an order's payment status changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdatedEvent {
    pub order: Order,
}

impl OrderUpdatedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Emitted when a webhook has been applied to an order. Carries the normalised payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentWebhookEvent {
    pub webhook: PaymentWebhook,
}

impl PaymentWebhookEvent {
    pub fn new(webhook: PaymentWebhook) -> Self {
        Self { webhook }
    }
}
