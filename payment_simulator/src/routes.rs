//! Request handler definitions
//!
//! The payment handler is generic over the webhook sender and the task runner, so that tests can mount it without
//! making any network calls.
use actix_web::{get, web, HttpResponse, Responder};
use hs_common::{live::LiveMonitor, route, PaymentRequest, TaskRunner};
use log::*;

use crate::{config::SERVICE_NAME, data_objects::HealthResponse, gateway::PaymentGateway, webhook_sender::WebhookSender};

#[get("/health")]
pub async fn health(monitor: web::Data<LiveMonitor>) -> impl Responder {
    trace!("💳️ Received health check request");
    let status = monitor.service_status();
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        location: status.location,
        connection_method: status.connection_method,
    })
}

route!(payment => Post "/payment" impl WebhookSender, TaskRunner);
/// Accepts a payment with `202 Accepted`. The settlement webhook follows once the requested delay has elapsed.
pub async fn payment<W, T>(body: web::Json<PaymentRequest>, gateway: web::Data<PaymentGateway<W, T>>) -> HttpResponse
where
    W: WebhookSender,
    T: TaskRunner,
{
    let request = body.into_inner();
    debug!("💳️ POST payment for order [{}]", request.order_id().unwrap_or("unknown"));
    HttpResponse::Accepted().json(gateway.accept_payment(request))
}
