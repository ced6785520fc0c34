use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, OrderUpdatedEvent, PaymentWebhookEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_updated_producer: Vec<EventProducer<OrderUpdatedEvent>>,
    pub payment_webhook_producer: Vec<EventProducer<PaymentWebhookEvent>>,
}

impl EventProducers {
    pub async fn publish_order_updated(&self, event: OrderUpdatedEvent) {
        for emitter in &self.order_updated_producer {
            emitter.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_payment_webhook(&self, event: PaymentWebhookEvent) {
        for emitter in &self.payment_webhook_producer {
            emitter.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_order_updated: Option<EventHandler<OrderUpdatedEvent>>,
    pub on_payment_webhook: Option<EventHandler<PaymentWebhookEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_updated = hooks.on_order_updated.map(|f| EventHandler::new(buffer_size, f));
        let on_payment_webhook = hooks.on_payment_webhook.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_updated, on_payment_webhook }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_updated {
            result.order_updated_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_payment_webhook {
            result.payment_webhook_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_order_updated {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_payment_webhook {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_updated: Option<Handler<OrderUpdatedEvent>>,
    pub on_payment_webhook: Option<Handler<PaymentWebhookEvent>>,
}

impl EventHooks {
    pub fn on_order_updated<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderUpdatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_updated = Some(Arc::new(f));
        self
    }

    pub fn on_payment_webhook<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PaymentWebhookEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_payment_webhook = Some(Arc::new(f));
        self
    }
}
