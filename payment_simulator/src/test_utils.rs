use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use hs_common::PaymentWebhook;

use crate::webhook_sender::{DeliveryError, WebhookSender};

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub url: String,
    pub webhook: PaymentWebhook,
    pub timeout: Option<Duration>,
}

#[derive(Default)]
struct MockState {
    deliveries: Vec<Delivery>,
    unreachable: HashSet<String>,
}

/// A [`WebhookSender`] that records every delivery attempt. Deliveries to URLs marked as unreachable fail.
#[derive(Clone, Default)]
pub struct MockWebhookSender {
    state: Arc<Mutex<MockState>>,
}

impl MockWebhookSender {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn make_unreachable(&self, url: &str) {
        self.state().unreachable.insert(url.to_string());
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.state().deliveries.clone()
    }
}

impl WebhookSender for MockWebhookSender {
    async fn deliver(&self, url: &str, webhook: &PaymentWebhook, timeout: Option<Duration>) -> Result<(), DeliveryError> {
        let mut state = self.state();
        state.deliveries.push(Delivery { url: url.to_string(), webhook: webhook.clone(), timeout });
        if state.unreachable.contains(url) {
            return Err(DeliveryError::Unreachable("connection refused".into()));
        }
        Ok(())
    }
}
