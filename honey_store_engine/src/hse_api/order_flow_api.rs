use std::{fmt::Debug, time::Duration};

use chrono::Utc;
use hs_common::{
    live::LiveMonitor,
    PaymentData,
    PaymentRequest,
    PaymentResponse,
    PaymentWebhook,
    TaskRunner,
    WebhookPayload,
};
use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderId, PaymentStatus},
    events::{EventProducers, OrderUpdatedEvent, PaymentWebhookEvent},
    hse_api::{dispatcher::PaymentDispatcher, errors::OrderFlowError, webhook_policy::WebhookPolicy},
    OrderManagement,
};

const RETRYABLE: [PaymentStatus; 2] = [PaymentStatus::Rejected, PaymentStatus::Error];

/// Static settings for the order flow.
#[derive(Debug, Clone)]
pub struct FlowOptions {
    /// The full URL the gateway should post settlement webhooks to
    pub callback_url: String,
    /// Currency code sent with every payment request
    pub currency: String,
    pub webhook_policy: WebhookPolicy,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            callback_url: "http://backend:3000/api/webhook/payment".to_string(),
            currency: "USD".to_string(),
            webhook_policy: WebhookPolicy::default(),
        }
    }
}

/// `OrderFlowApi` drives the payment lifecycle of an order.
///
/// Order creation and payment retries answer immediately. Submitting the payment to the gateway happens in a
/// background task handed to the [`TaskRunner`], and the final outcome arrives later through
/// [`OrderFlowApi::process_webhook`].
///
/// ```text
///                 dispatch fails
///     pending ─────────────────────────▶ error
///        │  ▲                              │
///        │  └──────── retry ───────────────┤
///        │  ▲                              │
///        │  └──────── retry ──── rejected ◀┘ (webhook)
///        ▼
///     approved (webhook)
/// ```
#[derive(Clone)]
pub struct OrderFlowApi<B, D, T> {
    db: B,
    dispatcher: D,
    runner: T,
    producers: EventProducers,
    monitor: LiveMonitor,
    options: FlowOptions,
}

impl<B, D, T> Debug for OrderFlowApi<B, D, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({})", self.options.callback_url)
    }
}

impl<B, D, T> OrderFlowApi<B, D, T> {
    pub fn new(
        db: B,
        dispatcher: D,
        runner: T,
        producers: EventProducers,
        monitor: LiveMonitor,
        options: FlowOptions,
    ) -> Self {
        Self { db, dispatcher, runner, producers, monitor, options }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }
}

impl<B, D, T> OrderFlowApi<B, D, T>
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    /// Stores a new order as `pending` and schedules its payment submission. Returns as soon as the order is stored.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, OrderFlowError> {
        let order = self.db.insert_order(order).await.map_err(OrderFlowError::database)?;
        info!("🔄️📦️ Order [{}] created for {:.2} {}", order.order_id, order.total, self.options.currency);
        self.schedule_dispatch(&order);
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        self.db
            .fetch_order_by_order_id(order_id)
            .await
            .map_err(OrderFlowError::database)?
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))
    }

    /// All orders, newest first.
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, OrderFlowError> {
        self.db.fetch_orders().await.map_err(OrderFlowError::database)
    }

    /// Deletes every order and returns how many were deleted. Payments that are still in flight will settle against
    /// missing orders, which is a no-op.
    pub async fn clear_orders(&self) -> Result<u64, OrderFlowError> {
        let count = self.db.delete_all_orders().await.map_err(OrderFlowError::database)?;
        info!("🔄️🗑️ {count} orders cleared");
        Ok(count)
    }

    /// Hands the payment submission for `order` to the task runner.
    pub fn schedule_dispatch(&self, order: &Order) {
        let api = self.clone();
        let order_id = order.order_id.clone();
        let amount = order.total;
        let email = order.customer_email.clone();
        self.runner.submit(Box::pin(async move {
            if let Err(e) = api.dispatch_payment(&order_id, amount, &email).await {
                debug!("🔄️💳️ Background dispatch for order [{order_id}] ended with: {e}");
            }
        }));
    }

    /// Submits the payment for an order to the gateway.
    ///
    /// The settle delay is taken from the admin config at the time of the call. If the gateway cannot be reached or
    /// refuses the request, the order moves from `pending` to `error` and the error is returned.
    pub async fn dispatch_payment(
        &self,
        order_id: &OrderId,
        amount: f64,
        customer_email: &str,
    ) -> Result<PaymentResponse, OrderFlowError> {
        let delay = self.monitor.admin_config().settle_delay_secs();
        let data = PaymentData::new(order_id.as_str(), amount, &self.options.currency, customer_email);
        let request = PaymentRequest::new(&self.options.callback_url, delay, data);
        trace!("🔄️💳️ Submitting payment for order [{order_id}] with a {delay}s settle delay");
        match self.dispatcher.dispatch(request).await {
            Ok(response) => {
                info!("🔄️💳️ Payment {} for order [{order_id}] accepted by the gateway", response.payment_id);
                Ok(response)
            },
            Err(e) => {
                warn!("🔄️💳️ Payment submission for order [{order_id}] failed. {e}");
                let updated = self
                    .db
                    .update_payment_status(order_id, PaymentStatus::Error, &[PaymentStatus::Pending])
                    .await
                    .map_err(OrderFlowError::database)?;
                match updated {
                    Some(order) => self.producers.publish_order_updated(OrderUpdatedEvent::new(order)).await,
                    None => debug!("🔄️💳️ Order [{order_id}] is gone or no longer pending. Not marking it as failed."),
                }
                Err(e.into())
            },
        }
    }

    /// Applies a settlement webhook in either of the accepted shapes.
    ///
    /// Returns the updated order, or `None` if the order does not exist or the webhook policy left it untouched. Both
    /// cases count as success. Only a payload without an order id is an error.
    pub async fn process_webhook(&self, payload: serde_json::Value) -> Result<Option<Order>, OrderFlowError> {
        let webhook = WebhookPayload::from_json(payload)?.normalize()?;
        self.apply_webhook(webhook).await
    }

    pub async fn apply_webhook(&self, webhook: PaymentWebhook) -> Result<Option<Order>, OrderFlowError> {
        let order_id = OrderId::from(webhook.order_id.as_str());
        let status = webhook.status.as_payment_status();
        debug!("🔄️📬️ Webhook for order [{order_id}]: {} ({})", webhook.status, webhook.message);
        let policy = self.options.webhook_policy;
        let updated = self
            .db
            .update_payment_status(&order_id, status, policy.applies_from())
            .await
            .map_err(OrderFlowError::database)?;
        match &updated {
            Some(order) => {
                info!("🔄️📬️ Order [{order_id}] payment is now {}", order.payment_status);
                self.producers.publish_order_updated(OrderUpdatedEvent::new(order.clone())).await;
                self.producers.publish_payment_webhook(PaymentWebhookEvent::new(webhook)).await;
            },
            None => info!("🔄️📬️ Webhook for order [{order_id}] ignored. Order is missing or the {policy} policy applies"),
        }
        Ok(updated)
    }

    /// Resets a `rejected` or `error` order to `pending` and schedules a fresh payment submission with the order's
    /// original amount and email.
    pub async fn retry_payment(&self, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        let order = self.fetch_order(order_id).await?;
        if !order.payment_status.is_retryable() {
            return Err(OrderFlowError::InvalidState(order.payment_status));
        }
        let updated = self
            .db
            .update_payment_status(order_id, PaymentStatus::Pending, &RETRYABLE)
            .await
            .map_err(OrderFlowError::database)?;
        let order = match updated {
            Some(order) => order,
            // The status changed between the read and the update
            None => return Err(OrderFlowError::InvalidState(self.fetch_order(order_id).await?.payment_status)),
        };
        info!("🔄️🔁️ Payment retry for order [{order_id}] initiated");
        self.producers.publish_order_updated(OrderUpdatedEvent::new(order.clone())).await;
        self.schedule_dispatch(&order);
        Ok(order)
    }

    /// Moves orders that have been `pending` for longer than `timeout` to `error`, so that they can be retried.
    /// Returns the orders that were moved.
    pub async fn expire_stale_payments(&self, timeout: Duration) -> Result<Vec<Order>, OrderFlowError> {
        let cutoff = match chrono::Duration::from_std(timeout).ok().and_then(|t| Utc::now().checked_sub_signed(t)) {
            Some(cutoff) => cutoff,
            None => return Ok(Vec::new()),
        };
        let stale = self.db.fetch_stale_pending_orders(cutoff).await.map_err(OrderFlowError::database)?;
        let mut expired = Vec::with_capacity(stale.len());
        for order in stale {
            let updated = self
                .db
                .update_payment_status(&order.order_id, PaymentStatus::Error, &[PaymentStatus::Pending])
                .await
                .map_err(OrderFlowError::database)?;
            if let Some(order) = updated {
                warn!("🔄️🕰️ No settlement received for order [{}]. Marking payment as failed.", order.order_id);
                self.producers.publish_order_updated(OrderUpdatedEvent::new(order.clone())).await;
                expired.push(order);
            }
        }
        Ok(expired)
    }

    /// Probes the database and updates the service health flag to match. Returns whether the database is reachable.
    pub async fn check_database(&self) -> bool {
        let healthy = match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("🔄️ Database health check failed. {e}");
                false
            },
        };
        self.monitor.set_healthy(healthy);
        healthy
    }
}
