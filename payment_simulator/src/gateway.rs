//! Payment acceptance and asynchronous settlement.
use std::time::Duration;

use hs_common::{live::LiveMonitor, PaymentRequest, PaymentResponse, PaymentWebhook, SettlementStatus, TaskRunner};
use log::*;

use crate::{config::GatewayOptions, webhook_sender::WebhookSender};

pub const APPROVED_MESSAGE: &str = "Payment approved successfully";
pub const REJECTED_MESSAGE: &str = "Payment rejected due to simulated error";
pub const UNDELIVERED_MESSAGE: &str = "Payment processing failed - webhook could not be delivered";

/// How a settlement ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The outcome reached the backend
    Delivered(PaymentWebhook),
    /// The outcome could not be delivered, but an `error` report reached the fallback address
    ReportedToFallback(PaymentWebhook),
    /// Nothing reached the backend. The order stays `pending` as far as this service is concerned.
    Undelivered,
}

/// The simulated payment gateway.
///
/// Payments are accepted immediately. Each one is settled in a background task handed to the [`TaskRunner`]: after the
/// requested delay, the outcome is decided from the admin config *at that moment* and posted to the payment's webhook
/// URL. If that delivery fails and a fallback address is configured, a single `error` report is sent there instead.
/// Nothing is retried beyond that, and nothing is persisted.
#[derive(Clone)]
pub struct PaymentGateway<W, T> {
    sender: W,
    runner: T,
    monitor: LiveMonitor,
    options: GatewayOptions,
}

impl<W, T> PaymentGateway<W, T> {
    pub fn new(sender: W, runner: T, monitor: LiveMonitor, options: GatewayOptions) -> Self {
        Self { sender, runner, monitor, options }
    }

    pub fn monitor(&self) -> &LiveMonitor {
        &self.monitor
    }

    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }
}

impl<W, T> PaymentGateway<W, T>
where
    W: WebhookSender,
    T: TaskRunner,
{
    /// Accepts a payment and schedules its settlement. Always answers with a `processing` response.
    ///
    /// A request without an order id cannot be settled. It is still accepted, but a warning is logged and no webhook
    /// will ever be sent for it.
    pub fn accept_payment(&self, request: PaymentRequest) -> PaymentResponse {
        let response = PaymentResponse::processing();
        let order_id = match request.order_id() {
            Some(id) => id.to_string(),
            None => {
                warn!("💳️ Payment {} has no order id. It will not be settled.", response.payment_id);
                return response;
            },
        };
        let delay = match request.sleep {
            Some(secs) => Duration::from_secs(secs),
            None => self.monitor.admin_config().payment_delay(),
        };
        let amount = request.amount();
        let webhook_url = request
            .webhook_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.options.default_webhook_url.clone());
        info!(
            "💳️ Payment {} of {amount:.2} for order [{order_id}] accepted. Settling in {}ms",
            response.payment_id,
            delay.as_millis()
        );
        let gateway = self.clone();
        self.runner.submit(Box::pin(async move {
            let result = gateway.settle(&order_id, delay, &webhook_url).await;
            trace!("💳️ Settlement for order [{order_id}] finished: {result:?}");
        }));
        response
    }

    /// Waits for `delay`, then decides the outcome and delivers it to `webhook_url`.
    pub async fn settle(&self, order_id: &str, delay: Duration, webhook_url: &str) -> Settlement {
        tokio::time::sleep(delay).await;
        let webhook = self.outcome(order_id);
        debug!("💳️ Sending {} webhook for order [{order_id}] to {webhook_url}", webhook.status);
        match self.sender.deliver(webhook_url, &webhook, None).await {
            Ok(()) => {
                info!("💳️ Payment {} for order [{order_id}] settled as {}", webhook.payment_id, webhook.status);
                Settlement::Delivered(webhook)
            },
            Err(e) => {
                warn!("💳️ Could not deliver the webhook for order [{order_id}]. {e}");
                self.report_failure(order_id).await
            },
        }
    }

    fn outcome(&self, order_id: &str) -> PaymentWebhook {
        if self.monitor.admin_config().simulate_payment_error {
            PaymentWebhook::new(order_id, SettlementStatus::Rejected, REJECTED_MESSAGE)
        } else {
            PaymentWebhook::new(order_id, SettlementStatus::Approved, APPROVED_MESSAGE)
        }
    }

    async fn report_failure(&self, order_id: &str) -> Settlement {
        let url = match self.options.fallback_webhook_url.as_deref() {
            Some(url) => url,
            None => {
                warn!("💳️ No fallback address is configured. Giving up on order [{order_id}].");
                return Settlement::Undelivered;
            },
        };
        let webhook = PaymentWebhook::new(order_id, SettlementStatus::Error, UNDELIVERED_MESSAGE);
        info!("💳️ Reporting the failed settlement for order [{order_id}] to {url}");
        match self.sender.deliver(url, &webhook, Some(self.options.fallback_timeout)).await {
            Ok(()) => Settlement::ReportedToFallback(webhook),
            Err(e) => {
                error!("💳️ Could not deliver the error report for order [{order_id}] either. {e}");
                Settlement::Undelivered
            },
        }
    }
}
