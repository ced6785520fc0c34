//! Delivery of settlement webhooks to the order backend.
use std::{
    future::Future,
    time::{Duration, Instant},
};

use hs_common::{
    live::{LiveMonitor, REQUEST_SOURCE_HEADER},
    PaymentWebhook,
    RequestLog,
};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Url,
};
use thiserror::Error;

use crate::{
    config::{BACKEND_NAME, SERVICE_NAME},
    errors::SimulatorError,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("{0} is not a valid webhook URL")]
    InvalidUrl(String),
    #[error("The backend did not answer within {0}s")]
    Timeout(u64),
    #[error("The backend could not be reached. {0}")]
    Unreachable(String),
    #[error("The backend refused the webhook with status {status}. {body}")]
    Refused { status: u16, body: String },
}

pub trait WebhookSender: Clone + Send + Sync + 'static {
    /// Posts `webhook` to `url`. Without a `timeout`, the call waits as long as the transport allows.
    fn deliver(
        &self,
        url: &str,
        webhook: &PaymentWebhook,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// Sends webhooks over HTTP and records every attempt in the request log.
#[derive(Clone)]
pub struct HttpWebhookSender {
    client: Client,
    monitor: LiveMonitor,
}

impl HttpWebhookSender {
    pub fn new(monitor: LiveMonitor) -> Result<Self, SimulatorError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert(REQUEST_SOURCE_HEADER, HeaderValue::from_static(SERVICE_NAME));
        let client = Client::builder()
            .user_agent("Honey Store Payment Simulator")
            .default_headers(headers)
            .build()
            .map_err(|e| SimulatorError::InitializeError(format!("Could not create the webhook client. {e}")))?;
        Ok(Self { client, monitor })
    }

    async fn post(&self, url: Url, webhook: &PaymentWebhook, timeout: Option<Duration>) -> Result<u16, DeliveryError> {
        let mut request = self.client.post(url).json(webhook);
        if let Some(t) = timeout {
            request = request.timeout(t);
        }
        let response = request.send().await.map_err(|e| match timeout {
            Some(t) if e.is_timeout() => DeliveryError::Timeout(t.as_secs()),
            _ => DeliveryError::Unreachable(e.to_string()),
        })?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Refused { status: status.as_u16(), body });
        }
        Ok(status.as_u16())
    }
}

impl WebhookSender for HttpWebhookSender {
    async fn deliver(&self, url: &str, webhook: &PaymentWebhook, timeout: Option<Duration>) -> Result<(), DeliveryError> {
        let url = Url::parse(url).map_err(|_| DeliveryError::InvalidUrl(url.to_string()))?;
        let mut entry = RequestLog::new(SERVICE_NAME, BACKEND_NAME, "POST", url.path());
        trace!("💳️ Posting {} webhook for order [{}] to {url}", webhook.status, webhook.order_id);
        let start = Instant::now();
        let result = self.post(url, webhook, timeout).await;
        entry = match &result {
            Ok(status) => entry.completed(*status, start.elapsed()),
            Err(DeliveryError::Refused { status, .. }) => entry.completed(*status, start.elapsed()),
            Err(_) => {
                entry.duration = Some(u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX));
                entry
            },
        };
        self.monitor.record_request(entry);
        result.map(|_| ())
    }
}
