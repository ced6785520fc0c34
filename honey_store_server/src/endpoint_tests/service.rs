use actix_web::{http::StatusCode, test::TestRequest};
use hs_common::live::LiveEvent;
use serde_json::json;

use super::helpers::*;

#[actix_web::test]
async fn health_reports_the_database() {
    let sys = test_system().await;
    let (status, body) = send_json(&sys, TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "healthy",
            "service": "backend",
            "location": "local",
            "connectionMethod": "direct",
            "database": "connected"
        })
    );
    assert!(sys.monitor.service_status().healthy);
    let logs = sys.monitor.request_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].source, "external");
    assert_eq!(logs[0].path, "/health");
}

#[actix_web::test]
async fn health_notices_a_closed_database() {
    let sys = test_system().await;
    let mut events = sys.monitor.subscribe().unwrap();
    // Clones share the connection pool
    let mut api = sys.api.clone();
    api.db_mut().close().await.unwrap();
    let (status, body) = send_json(&sys, TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "disconnected");
    assert!(!sys.monitor.service_status().healthy);
    let mut saw_status = false;
    while let Ok(event) = events.try_recv() {
        if let LiveEvent::ServiceStatus(s) = event {
            saw_status = !s.healthy;
        }
    }
    assert!(saw_status, "No unhealthy service-status event was broadcast");
}

#[actix_web::test]
async fn connection_info() {
    let sys = test_system().await;
    let (status, body) = send_json(&sys, TestRequest::get().uri("/api/connection-info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "connectionMethod": "direct",
            "serviceLocation": "local",
            "canReceiveWebhooks": true,
            "webhookUrl": "http://backend:3000/api/webhook/payment"
        })
    );
}

#[actix_web::test]
async fn frontend_requests_are_tagged() {
    let sys = test_system().await;
    let req = TestRequest::get().uri("/api/orders").insert_header(("X-Request-Source", "frontend"));
    send(&sys, req).await;
    let logs = sys.monitor.request_logs();
    assert_eq!(logs[0].source, "frontend");
    assert_eq!(logs[0].method, "GET");
    assert_eq!(logs[0].status, Some(200));
}
