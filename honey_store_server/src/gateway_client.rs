//! The HTTP client side of payment submission.
use std::time::{Duration, Instant};

use honey_store_engine::{DispatchError, PaymentDispatcher};
use hs_common::{
    live::{LiveMonitor, REQUEST_SOURCE_HEADER},
    GatewayStatus,
    PaymentRequest,
    PaymentResponse,
    RequestLog,
};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};

use crate::{
    config::{PAYMENT_PATH, SERVICE_NAME},
    errors::ServerError,
};

pub const GATEWAY_NAME: &str = "payment-service";

/// Posts payment requests to the gateway's `/api/payment` endpoint. Every call is recorded in the request log.
#[derive(Clone)]
pub struct HttpPaymentDispatcher {
    client: Client,
    payment_url: String,
    timeout: Duration,
    monitor: LiveMonitor,
}

impl HttpPaymentDispatcher {
    pub fn new(payment_url: &str, timeout: Duration, monitor: LiveMonitor) -> Result<Self, ServerError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert(REQUEST_SOURCE_HEADER, HeaderValue::from_static(SERVICE_NAME));
        let client = Client::builder()
            .user_agent("Honey Store Backend")
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::InitializeError(format!("Could not create the gateway client. {e}")))?;
        Ok(Self { client, payment_url: payment_url.to_string(), timeout, monitor })
    }

    pub fn payment_url(&self) -> &str {
        &self.payment_url
    }

    async fn post(&self, request: &PaymentRequest) -> Result<(u16, PaymentResponse), DispatchError> {
        let response = self.client.post(&self.payment_url).json(request).send().await.map_err(|e| {
            if e.is_timeout() {
                DispatchError::Timeout(self.timeout.as_secs())
            } else {
                DispatchError::Unreachable(e.to_string())
            }
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| DispatchError::Unreachable(e.to_string()))?;
        if status.is_client_error() || status.is_server_error() {
            return Err(DispatchError::Refused { status: status.as_u16(), body });
        }
        // Any non-error answer means the gateway has the payment, even if we can't read the body
        let response = serde_json::from_str::<PaymentResponse>(&body).unwrap_or_else(|e| {
            warn!("💻️ Gateway accepted the payment but sent an unexpected body. {e}");
            PaymentResponse { payment_id: String::default(), status: GatewayStatus::Processing, message: body }
        });
        Ok((status.as_u16(), response))
    }
}

impl PaymentDispatcher for HttpPaymentDispatcher {
    async fn dispatch(&self, request: PaymentRequest) -> Result<PaymentResponse, DispatchError> {
        let mut entry = RequestLog::new(SERVICE_NAME, GATEWAY_NAME, "POST", PAYMENT_PATH);
        let start = Instant::now();
        let result = self.post(&request).await;
        entry = match &result {
            Ok((status, _)) => entry.completed(*status, start.elapsed()),
            Err(DispatchError::Refused { status, .. }) => entry.completed(*status, start.elapsed()),
            Err(_) => {
                entry.duration = Some(u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX));
                entry
            },
        };
        self.monitor.record_request(entry);
        result.map(|(_, response)| response)
    }
}
