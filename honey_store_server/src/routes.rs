//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! The order handlers are generic over the order store, the payment dispatcher and the task runner, so that tests can
//! mount them against a scripted gateway. Since each worker thread processes its requests sequentially, nothing in
//! here may block: payment submission is always handed off to the task runner before the response goes out.
use actix_web::{get, web, HttpResponse, Responder};
use honey_store_engine::{
    db_types::{NewOrder, OrderId},
    OrderFlowApi,
    OrderManagement,
    PaymentDispatcher,
};
use hs_common::{live::LiveMonitor, route, TaskRunner};
use log::*;

use crate::{
    config::SERVICE_NAME,
    data_objects::{ConnectionInfo, HealthResponse, JsonResponse, OrderCreated, OrderList, OrdersCleared, RetryStarted},
    errors::ServerError,
};

// ----------------------------------------------   Health  ----------------------------------------------------
route!(health => Get "/health" impl OrderManagement, PaymentDispatcher, TaskRunner);
/// Reports the service's connectivity settings and whether the order store is reachable. Each call also refreshes the
/// health flag that is broadcast to dashboard observers.
pub async fn health<B, D, T>(api: web::Data<OrderFlowApi<B, D, T>>, monitor: web::Data<LiveMonitor>) -> HttpResponse
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    trace!("💻️ Received health check request");
    let database = if api.check_database().await { "connected" } else { "disconnected" };
    let status = monitor.service_status();
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        location: status.location,
        connection_method: status.connection_method,
        database: database.to_string(),
    })
}

#[get("/connection-info")]
pub async fn connection_info(info: web::Data<ConnectionInfo>) -> impl Responder {
    HttpResponse::Ok().json(info.get_ref())
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(orders => Get "/orders" impl OrderManagement, PaymentDispatcher, TaskRunner);
/// All orders, newest first, along with a summary of how the backend is connected.
pub async fn orders<B, D, T>(
    api: web::Data<OrderFlowApi<B, D, T>>,
    info: web::Data<ConnectionInfo>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    debug!("💻️ GET orders");
    let orders = api.fetch_orders().await?;
    Ok(HttpResponse::Ok().json(OrderList { orders, connection_info: info.summary() }))
}

route!(order_by_id => Get "/orders/{id}" impl OrderManagement, PaymentDispatcher, TaskRunner);
pub async fn order_by_id<B, D, T>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B, D, T>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    let order_id: OrderId = path.into_inner().into();
    debug!("💻️ GET order [{order_id}]");
    let order = api.fetch_order(&order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(create_order => Post "/orders" impl OrderManagement, PaymentDispatcher, TaskRunner);
/// Stores the order and answers `201` straight away. The payment is submitted in the background, and its outcome only
/// shows up later in the order's `paymentStatus`.
pub async fn create_order<B, D, T>(
    body: web::Json<NewOrder>,
    api: web::Data<OrderFlowApi<B, D, T>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    let new_order = body.into_inner();
    debug!("💻️ POST new order for {} ({} items)", new_order.customer_email, new_order.items.len());
    let order = api.create_order(new_order).await?;
    Ok(HttpResponse::Created().json(OrderCreated {
        order_id: order.order_id,
        message: "Order created successfully. Payment is being processed.".to_string(),
    }))
}

route!(clear_orders => Delete "/orders" impl OrderManagement, PaymentDispatcher, TaskRunner);
pub async fn clear_orders<B, D, T>(api: web::Data<OrderFlowApi<B, D, T>>) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    info!("💻️ DELETE all orders");
    let deleted_count = api.clear_orders().await?;
    Ok(HttpResponse::Ok().json(OrdersCleared { message: "All orders cleared successfully".to_string(), deleted_count }))
}

route!(retry_payment => Post "/orders/{id}/retry-payment" impl OrderManagement, PaymentDispatcher, TaskRunner);
/// Sends a `rejected` or `error` order back to `pending` and submits its payment again.
pub async fn retry_payment<B, D, T>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B, D, T>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    let order_id: OrderId = path.into_inner().into();
    debug!("💻️ POST retry payment for order [{order_id}]");
    let order = api.retry_payment(&order_id).await.map_err(|e| {
        debug!("💻️ Payment retry for order [{order_id}] refused. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(RetryStarted {
        message: "Payment retry initiated successfully".to_string(),
        order_id: order.order_id,
        status: order.payment_status,
    }))
}

//----------------------------------------------   Webhooks  ----------------------------------------------------
route!(payment_webhook => Post "/webhook/payment" impl OrderManagement, PaymentDispatcher, TaskRunner);
/// Settlement notifications from the payment gateway. Both the flat and the enveloped payload shapes are accepted.
///
/// Webhooks for unknown orders are acknowledged, since the gateway has no use for an error.
pub async fn payment_webhook<B, D, T>(
    body: web::Json<serde_json::Value>,
    api: web::Data<OrderFlowApi<B, D, T>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    trace!("💻️ Received payment webhook: {body}");
    match api.process_webhook(body.into_inner()).await {
        Ok(Some(order)) => debug!("💻️ Webhook applied. Order [{}] is {}", order.order_id, order.payment_status),
        Ok(None) => debug!("💻️ Webhook acknowledged without changes"),
        Err(e) => {
            warn!("💻️ Could not process payment webhook. {e}");
            return Err(e.into());
        },
    }
    Ok(HttpResponse::Ok().json(JsonResponse::new("Webhook processed successfully")))
}
