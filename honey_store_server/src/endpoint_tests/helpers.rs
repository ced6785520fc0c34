use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use honey_store_engine::{
    db_types::{NewOrder, OrderId, Product},
    events::EventProducers,
    test_utils::{MockDispatcher, QueuedTaskRunner, TestSystem},
    SqliteDatabase,
    WebhookPolicy,
};
use hs_common::live::AccessLogMiddlewareFactory;
use log::debug;
use serde_json::Value;

use crate::{
    config::{ServerConfig, SERVICE_NAME},
    data_objects::ConnectionInfo,
    errors::json_error_handler,
    server::configure_routes,
};

pub async fn test_system() -> TestSystem {
    TestSystem::new(WebhookPolicy::Overwrite, EventProducers::default()).await
}

/// Runs a single request against the backend routes, wired to the test system's store, dispatcher and monitor.
pub async fn send(sys: &TestSystem, req: TestRequest) -> (StatusCode, String) {
    let info = ConnectionInfo::from_config(&ServerConfig::default());
    let app = App::new()
        .wrap(AccessLogMiddlewareFactory::new(sys.monitor.clone(), SERVICE_NAME))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::Data::new(sys.api.clone()))
        .app_data(web::Data::new(sys.monitor.clone()))
        .app_data(web::Data::new(info))
        .configure(configure_routes::<SqliteDatabase, MockDispatcher, QueuedTaskRunner>);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    debug!("Response: {status} {body}");
    (status, body)
}

pub async fn send_json(sys: &TestSystem, req: TestRequest) -> (StatusCode, Value) {
    let (status, body) = send(sys, req).await;
    let value = serde_json::from_str(&body).unwrap_or_else(|e| panic!("Response was not JSON ({e}): {body}"));
    (status, value)
}

pub fn honey_order(total: f64) -> NewOrder {
    let product = Product {
        id: "wildflower".into(),
        name: "Wildflower Honey".into(),
        price: total,
        in_stock: true,
        ..Default::default()
    };
    NewOrder::new(total, "Alice", "alice@example.com", "1 Hive Lane").with_item(product, 1)
}

/// Places an order over HTTP and returns its id.
pub async fn place_order(sys: &TestSystem, total: f64) -> OrderId {
    let req = TestRequest::post().uri("/api/orders").set_json(honey_order(total));
    let (status, body) = send_json(sys, req).await;
    assert_eq!(status, StatusCode::CREATED);
    OrderId::from(body["orderId"].as_str().expect("orderId missing"))
}

pub async fn payment_status(sys: &TestSystem, order_id: &OrderId) -> String {
    let (status, order) = send_json(sys, TestRequest::get().uri(&format!("/api/orders/{order_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    order["paymentStatus"].as_str().expect("paymentStatus missing").to_string()
}
