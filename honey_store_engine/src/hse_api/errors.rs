use std::fmt::Display;

use hs_common::WebhookPayloadError;
use thiserror::Error;

use crate::{
    db_types::{OrderId, PaymentStatus},
    hse_api::dispatcher::DispatchError,
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),
    #[error("Order payment cannot be retried. Current status: {0}")]
    InvalidState(PaymentStatus),
    #[error("Invalid webhook payload. {0}")]
    InvalidWebhookPayload(#[from] WebhookPayloadError),
    #[error("Could not submit payment. {0}")]
    DispatchFailed(#[from] DispatchError),
}

impl OrderFlowError {
    pub fn database<E: Display>(e: E) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
