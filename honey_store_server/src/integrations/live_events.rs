//! Forwards order engine events to the live status broadcaster.
use futures::future::BoxFuture;
use honey_store_engine::events::{EventHandlers, EventHooks, OrderUpdatedEvent, PaymentWebhookEvent};
use hs_common::live::{LiveEvent, LiveMonitor};
use log::*;

pub const LIVE_EVENT_BUFFER_SIZE: usize = 64;

/// Creates the event handlers that push order changes to dashboard observers:
///
/// 1. OrderUpdatedEvent - the full order record is broadcast as `order-updated`.
/// 2. PaymentWebhookEvent - the normalised webhook is broadcast as `payment-webhook`.
///
/// Call `start_handlers` on the result once the producers have been handed to the order flow.
pub fn create_live_event_handlers(monitor: LiveMonitor) -> EventHandlers {
    let mut hooks = EventHooks::default();
    let monitor_clone = monitor.clone();
    // --- On OrderUpdated Handler ---
    hooks.on_order_updated(move |ev: OrderUpdatedEvent| -> BoxFuture<'static, ()> {
        let monitor = monitor_clone.clone();
        Box::pin(async move {
            match serde_json::to_value(&ev.order) {
                Ok(order) => monitor.publish(LiveEvent::OrderUpdated(order)),
                Err(e) => error!("📬️ Could not serialize order [{}] for observers. {e}", ev.order.order_id),
            }
        })
    });
    // --- On PaymentWebhook Handler ---
    hooks.on_payment_webhook(move |ev: PaymentWebhookEvent| -> BoxFuture<'static, ()> {
        let monitor = monitor.clone();
        Box::pin(async move {
            trace!("📬️ Broadcasting webhook for order [{}]", ev.webhook.order_id);
            monitor.publish(LiveEvent::PaymentWebhook(ev.webhook));
        })
    });
    EventHandlers::new(LIVE_EVENT_BUFFER_SIZE, hooks)
}
