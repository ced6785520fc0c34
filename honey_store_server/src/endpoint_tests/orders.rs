use actix_web::{http::StatusCode, test::TestRequest};
use honey_store_engine::DispatchError;
use serde_json::json;

use super::helpers::*;

#[actix_web::test]
async fn new_orders_are_pending() {
    let sys = test_system().await;
    let req = TestRequest::post().uri("/api/orders").set_json(honey_order(24.99));
    let (status, body) = send_json(&sys, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order created successfully. Payment is being processed.");
    let order_id = body["orderId"].as_str().unwrap().to_string();
    assert_eq!(order_id.len(), 24);

    // The payment has not been submitted yet, but the order is already there
    assert_eq!(sys.dispatcher.request_count(), 0);
    assert_eq!(sys.runner.pending(), 1);
    let (status, order) = send_json(&sys, TestRequest::get().uri(&format!("/api/orders/{order_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["_id"], order_id);
    assert_eq!(order["paymentStatus"], "pending");
    assert_eq!(order["total"], 24.99);
    assert_eq!(order["items"][0]["product"]["name"], "Wildflower Honey");

    sys.runner.run_pending().await;
    assert_eq!(sys.dispatcher.request_count(), 1);
    assert_eq!(payment_status(&sys, &order_id.into()).await, "pending");
}

#[actix_web::test]
async fn failed_submission_marks_the_order_as_error() {
    let sys = test_system().await;
    sys.dispatcher.set_failure(Some(DispatchError::Unreachable("connection refused".into())));
    let order_id = place_order(&sys, 10.0).await;
    assert_eq!(payment_status(&sys, &order_id).await, "pending");
    sys.runner.run_pending().await;
    assert_eq!(payment_status(&sys, &order_id).await, "error");
}

#[actix_web::test]
async fn malformed_orders_are_rejected() {
    let sys = test_system().await;
    let req = TestRequest::post().uri("/api/orders").set_json(json!({"customerName": "Alice"}));
    let (status, body) = send_json(&sys, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Could not read request body"), "{body}");
    assert_eq!(sys.runner.pending(), 0);
}

#[actix_web::test]
async fn unknown_orders() {
    let sys = test_system().await;
    let (status, body) = send_json(&sys, TestRequest::get().uri("/api/orders/000000000000000000000000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Order not found"}));
    let req = TestRequest::post().uri("/api/orders/000000000000000000000000/retry-payment");
    let (status, _) = send_json(&sys, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_orders_newest_first() {
    let sys = test_system().await;
    let first = place_order(&sys, 1.0).await;
    let second = place_order(&sys, 2.0).await;
    let (status, body) = send_json(&sys, TestRequest::get().uri("/api/orders")).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["_id"], second.as_str());
    assert_eq!(orders[1]["_id"], first.as_str());
    assert_eq!(body["connectionInfo"], json!({"method": "direct", "location": "local", "canReceiveWebhooks": true}));
}

#[actix_web::test]
async fn clear_orders() {
    let sys = test_system().await;
    for i in 0..3 {
        place_order(&sys, i as f64).await;
    }
    let (status, body) = send_json(&sys, TestRequest::delete().uri("/api/orders")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 3);
    let (_, body) = send_json(&sys, TestRequest::get().uri("/api/orders")).await;
    assert_eq!(body["orders"], json!([]));
    // Payments still in flight for the deleted orders are harmless
    assert_eq!(sys.runner.run_pending().await, 3);
}

#[actix_web::test]
async fn retry_only_failed_payments() {
    let sys = test_system().await;
    let order_id = place_order(&sys, 24.99).await;
    sys.runner.run_pending().await;
    let retry = || TestRequest::post().uri(&format!("/api/orders/{order_id}/retry-payment"));

    let (status, body) = send_json(&sys, retry()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Order payment cannot be retried. Current status: pending");
    assert_eq!(payment_status(&sys, &order_id).await, "pending");

    let webhook = json!({"orderId": order_id.as_str(), "paymentId": "p1", "status": "rejected", "message": "no"});
    let (status, _) = send(&sys, TestRequest::post().uri("/api/webhook/payment").set_json(webhook)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment_status(&sys, &order_id).await, "rejected");

    let (status, body) = send_json(&sys, retry()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Payment retry initiated successfully", "orderId": order_id.as_str(), "status": "pending"})
    );
    assert_eq!(sys.runner.run_pending().await, 1);
    let requests = sys.dispatcher.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].amount(), 24.99);
    assert_eq!(requests[1].customer_email(), Some("alice@example.com"));

    let webhook = json!({"orderId": order_id.as_str(), "status": "approved"});
    send(&sys, TestRequest::post().uri("/api/webhook/payment").set_json(webhook)).await;
    let (status, body) = send_json(&sys, retry()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Order payment cannot be retried. Current status: approved");
}
