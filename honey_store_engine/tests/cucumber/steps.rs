use std::time::Duration;

use cucumber::{given, then, when};
use honey_store_engine::{
    db_types::{NewOrder, PaymentStatus},
    DispatchError,
    OrderFlowError,
};
use hs_common::AdminConfigUpdate;
use serde_json::json;

use crate::cucumber::OrderWorld;

#[given("the payment gateway is unreachable")]
async fn gateway_unreachable(world: &mut OrderWorld) {
    world.system().dispatcher.set_failure(Some(DispatchError::Unreachable("connection refused".into())));
}

#[given("the payment gateway is reachable")]
async fn gateway_reachable(world: &mut OrderWorld) {
    world.system().dispatcher.set_failure(None);
}

#[given(expr = "the payment delay is {int}ms")]
async fn payment_delay(world: &mut OrderWorld, ms: u64) {
    world.system().monitor.update_admin_config(AdminConfigUpdate::payment_delay_ms(ms));
}

#[when(expr = "{word} places order {word} for {float} USD")]
async fn place_order(world: &mut OrderWorld, customer: String, label: String, total: f64) {
    let email = format!("{}@example.com", customer.to_lowercase());
    let order = NewOrder::new(total, &customer, &email, "1 Hive Lane");
    let order = world.api().create_order(order).await.expect("Error creating order");
    world.orders.insert(label, order.order_id);
}

#[when("the background tasks run")]
async fn run_background_tasks(world: &mut OrderWorld) {
    world.system().runner.run_pending().await;
}

#[when(expr = "the gateway sends a flat webhook for order {word} with status {word}")]
async fn flat_webhook(world: &mut OrderWorld, label: String, status: String) {
    let id = world.order_id(&label);
    let payload = json!({"orderId": id.as_str(), "paymentId": "pay_flat", "status": status, "message": "test"});
    world.api().process_webhook(payload).await.expect("Error processing webhook");
}

#[when(expr = "the gateway sends an enveloped webhook for order {word} without a status")]
async fn enveloped_webhook(world: &mut OrderWorld, label: String) {
    let id = world.order_id(&label);
    let payload = json!({"payment_id": "pay_env", "data": {"orderId": id.as_str()}});
    world.api().process_webhook(payload).await.expect("Error processing webhook");
}

#[when("the gateway sends a webhook without an order id")]
async fn webhook_without_order(world: &mut OrderWorld) {
    let payload = json!({"paymentId": "pay_anon", "status": "approved"});
    world.last_error = world.api().process_webhook(payload).await.err();
}

#[when(expr = "the customer retries the payment for order {word}")]
async fn retry_payment(world: &mut OrderWorld, label: String) {
    let id = world.order_id(&label);
    world.last_error = world.api().retry_payment(&id).await.err();
}

#[when("all orders are cleared")]
async fn clear_orders(world: &mut OrderWorld) {
    world.last_deleted = Some(world.api().clear_orders().await.expect("Error clearing orders"));
}

#[when(expr = "payments have been pending for more than {int}ms")]
async fn expire_stale(world: &mut OrderWorld, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms + 10)).await;
    world.api().expire_stale_payments(Duration::from_millis(ms)).await.expect("Error expiring payments");
}

#[then(expr = "order {word} has payment status {word}")]
async fn check_status(world: &mut OrderWorld, label: String, status: String) {
    let expected = status.parse::<PaymentStatus>().expect("Not a payment status");
    let order = world.order(&label).await;
    assert_eq!(order.payment_status, expected, "Order {label} has the wrong payment status");
}

#[then(expr = "{int} payment request(s) has/have been sent")]
async fn check_request_count(world: &mut OrderWorld, count: usize) {
    assert_eq!(world.system().dispatcher.request_count(), count);
}

#[then(expr = "the last payment request asked for a {int} second settle delay")]
async fn check_settle_delay(world: &mut OrderWorld, secs: u64) {
    let requests = world.system().dispatcher.requests();
    let last = requests.last().expect("No payment requests were sent");
    assert_eq!(last.sleep, Some(secs));
}

#[then(expr = "the last payment request was for {float} USD from {word}")]
async fn check_last_request(world: &mut OrderWorld, amount: f64, email: String) {
    let requests = world.system().dispatcher.requests();
    let last = requests.last().expect("No payment requests were sent");
    assert_eq!(last.amount(), amount);
    assert_eq!(last.customer_email(), Some(email.as_str()));
}

#[then(expr = "the request fails with {string}")]
async fn check_error(world: &mut OrderWorld, message: String) {
    let err = world.last_error.as_ref().expect("Expected the last request to fail");
    assert_eq!(err.to_string(), message);
}

#[then("the request succeeds")]
async fn check_no_error(world: &mut OrderWorld) {
    if let Some(err) = &world.last_error {
        panic!("Expected success, got {err}");
    }
}

#[then("the webhook is rejected as invalid")]
async fn check_invalid_webhook(world: &mut OrderWorld) {
    assert!(matches!(world.last_error, Some(OrderFlowError::InvalidWebhookPayload(_))));
}

#[then(expr = "{int} orders were deleted")]
async fn check_deleted(world: &mut OrderWorld, count: u64) {
    assert_eq!(world.last_deleted, Some(count));
}

#[then(expr = "there are {int} orders")]
async fn check_order_count(world: &mut OrderWorld, count: usize) {
    let orders = world.api().fetch_orders().await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}
