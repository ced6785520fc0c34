use std::time::Duration;

use chrono::{DateTime, Utc};
use cucumber::{gherkin::Step, then, when};
use e2e::helpers::json_is_subset_of;
use hs_common::AdminConfigUpdate;
use log::debug;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use crate::cucumber::{world::eventually, HoneyWorld};

//----------------------------------------------   Orders  ----------------------------------------------------

#[when(expr = "{word} places order {word} for {float} USD")]
async fn place_order(world: &mut HoneyWorld, customer: String, label: String, total: f64) {
    let email = format!("{}@example.com", customer.to_lowercase());
    let order = json!({
        "items": [{"product": {"id": "wildflower", "name": "Wildflower Honey", "price": total, "inStock": true}, "quantity": 1}],
        "total": total,
        "customerName": customer,
        "customerEmail": email,
        "shippingAddress": "1 Hive Lane"
    });
    let (code, body) = world.backend_request(Method::POST, "/api/orders", |req| req.json(&order)).await;
    debug!("Got Response: {code} {body}");
    if code == StatusCode::CREATED {
        let created: Value = serde_json::from_str(&body).expect("Invalid JSON response");
        let id = created["orderId"].as_str().expect("No orderId in the response").to_string();
        world.orders.insert(label, id);
    }
    world.response = Some((code, body));
}

#[when(expr = "I fetch order {word}")]
async fn fetch_order(world: &mut HoneyWorld, label: String) {
    let id = world.order_id(&label);
    world.response = Some(world.backend_request(Method::GET, &format!("/api/orders/{id}"), |req| req).await);
}

#[when("I list the orders")]
async fn list_orders(world: &mut HoneyWorld) {
    world.response = Some(world.backend_request(Method::GET, "/api/orders", |req| req).await);
}

#[when("I clear all orders")]
async fn clear_orders(world: &mut HoneyWorld) {
    world.response = Some(world.backend_request(Method::DELETE, "/api/orders", |req| req).await);
}

#[when(expr = "I retry the payment for order {word}")]
async fn retry_payment(world: &mut HoneyWorld, label: String) {
    let id = world.order_id(&label);
    let path = format!("/api/orders/{id}/retry-payment");
    world.response = Some(world.backend_request(Method::POST, &path, |req| req).await);
}

#[when(expr = "I note when order {word} was last updated")]
async fn note_updated_at(world: &mut HoneyWorld, label: String) {
    let order = world.order(&label).await;
    let updated_at = order["updatedAt"].as_str().expect("Order has no updatedAt").to_string();
    world.timestamps.insert(label, updated_at);
}

#[then(expr = "order {word} is {word}")]
async fn order_status(world: &mut HoneyWorld, label: String, status: String) {
    let actual = world.payment_status(&label).await;
    assert_eq!(actual, status, "Expected order {label} to be {status}, but it is {actual}");
}

#[then(expr = "order {word} is {word} within {int} seconds")]
async fn order_status_eventually(world: &mut HoneyWorld, label: String, status: String, secs: u64) {
    let (world, label, status) = (&*world, label.as_str(), status.as_str());
    let reached = eventually(Duration::from_secs(secs), || async move { world.payment_status(label).await == status }).await;
    let actual = world.payment_status(label).await;
    assert!(reached, "Expected order {label} to be {status} within {secs}s, but it is {actual}");
}

#[then(expr = "order {word} is still {word} after {int} seconds")]
async fn order_status_unchanged(world: &mut HoneyWorld, label: String, status: String, secs: u64) {
    let (world, label, status) = (&*world, label.as_str(), status.as_str());
    let changed = eventually(Duration::from_secs(secs), || async move { world.payment_status(label).await != status }).await;
    let actual = world.payment_status(label).await;
    assert!(!changed, "Expected order {label} to stay {status}, but it is {actual}");
}

#[then(expr = "order {word} has been updated since")]
async fn order_was_updated(world: &mut HoneyWorld, label: String) {
    let before = world.timestamps.get(&label).cloned().expect("No timestamp was noted for this order");
    let order = world.order(&label).await;
    let after = order["updatedAt"].as_str().expect("Order has no updatedAt");
    let parse = |s: &str| s.parse::<DateTime<Utc>>().expect("Invalid timestamp");
    assert!(parse(after) > parse(&before), "updatedAt did not advance: {before} -> {after}");
}

#[then(expr = "there are {int} orders")]
async fn order_count(world: &mut HoneyWorld, count: usize) {
    assert_eq!(world.orders().await.len(), count);
}

#[then(expr = "the order list starts with order {word}")]
async fn newest_order_first(world: &mut HoneyWorld, label: String) {
    let orders = world.orders().await;
    let first = orders.first().expect("The order list is empty");
    assert_eq!(first["_id"], world.order_id(&label).as_str());
}

//----------------------------------------------   Gateway  ----------------------------------------------------

#[when("the payment gateway starts declining payments")]
async fn start_declining(world: &mut HoneyWorld) {
    world.simulator_monitor().update_admin_config(AdminConfigUpdate::simulate_payment_error(true));
}

#[when("the payment gateway stops declining payments")]
async fn stop_declining(world: &mut HoneyWorld) {
    world.simulator_monitor().update_admin_config(AdminConfigUpdate::simulate_payment_error(false));
}

#[when(expr = "I wait {int} second(s)")]
async fn wait_for(_world: &mut HoneyWorld, secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
}

#[then(expr = "the payment gateway has delivered {int} webhook(s) to the backend")]
async fn delivered_webhooks(world: &mut HoneyWorld, count: usize) {
    let monitor = world.simulator_monitor().clone();
    let delivered = || {
        monitor.request_logs().iter().filter(|l| l.destination == "backend" && l.status == Some(200)).count()
    };
    let delivered = &delivered;
    eventually(Duration::from_secs(2), || async move { delivered() == count }).await;
    assert_eq!(delivered(), count);
}

#[then(expr = "the payment gateway has failed to deliver {int} webhook(s)")]
async fn failed_webhooks(world: &mut HoneyWorld, count: usize) {
    let logs = world.simulator_monitor().request_logs();
    let failed = logs.iter().filter(|l| l.destination == "backend" && l.status.map_or(true, |s| s >= 400)).count();
    assert_eq!(failed, count, "Request log: {logs:?}");
}

//----------------------------------------------   Service  ----------------------------------------------------

#[when("I check the health of the backend")]
async fn backend_health(world: &mut HoneyWorld) {
    world.response = Some(world.backend_request(Method::GET, "/health", |req| req).await);
}

#[when("I check the health of the payment gateway")]
async fn gateway_health(world: &mut HoneyWorld) {
    world.response = Some(world.simulator_request(Method::GET, "/health", |req| req).await);
}

#[when("I ask the backend how it is connected")]
async fn connection_info(world: &mut HoneyWorld) {
    world.response = Some(world.backend_request(Method::GET, "/api/connection-info", |req| req).await);
}

//----------------------------------------------   Responses  ----------------------------------------------------

//             I receive a {int} {word} response with the message "Order not found"
#[then(expr = "I receive a {int} {word} response with the message {string}")]
async fn receive_response(world: &mut HoneyWorld, status: u16, text: String, message: String) {
    let (res_status, res_msg) = world.response.take().expect("No response received");
    assert_eq!(res_status, status, "Expected {status} {text} response, got {res_status}");
    assert!(res_msg.contains(&message), "Expected response to contain '{message}', got '{res_msg}'");
}

#[then(expr = "I receive a {int} {word} response")]
async fn receive_response_code(world: &mut HoneyWorld, status: u16, text: String) {
    let (res_status, _res_msg) = world.response.clone().expect("No response received");
    assert_eq!(res_status, status, "Expected {status} {text} response, got {res_status}");
}

#[then(expr = "I receive a partial JSON response:")]
async fn receive_json_response(world: &mut HoneyWorld, step: &Step) {
    let (_res_status, res_msg) = world.response.take().expect("No response received");
    let expected = step.docstring().expect("No expected response");
    assert!(json_is_subset_of(expected, res_msg.as_str()), "Expected response to contain '{expected}', got '{res_msg}'");
}
