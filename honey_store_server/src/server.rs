use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use honey_store_engine::{OrderFlowApi, OrderManagement, PaymentDispatcher, SqliteDatabase};
use hs_common::{
    live::{live_session, AccessLogMiddlewareFactory, LiveMonitor},
    AdminConfig,
    TaskRunner,
    TokioTaskRunner,
};
use log::*;

use crate::{
    config::{ServerConfig, SERVICE_NAME},
    data_objects::ConnectionInfo,
    errors::{json_error_handler, ServerError},
    gateway_client::HttpPaymentDispatcher,
    integrations::live_events::create_live_event_handlers,
    routes::{
        connection_info,
        ClearOrdersRoute,
        CreateOrderRoute,
        HealthRoute,
        OrderByIdRoute,
        OrdersRoute,
        PaymentWebhookRoute,
        RetryPaymentRoute,
    },
    sweep_worker::start_sweep_worker,
};

pub type BackendFlowApi = OrderFlowApi<SqliteDatabase, HttpPaymentDispatcher, TokioTaskRunner>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let monitor = LiveMonitor::new(config.service_status(), AdminConfig::default());
    let api = create_order_flow(&config, db, monitor.clone()).await?;
    let sweeper = start_sweep_worker(api.clone(), config.pending_payment_timeout, config.sweep_interval);
    let srv = create_server_instance(config, api, monitor.clone())?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    if let Some(handle) = sweeper {
        handle.abort();
    }
    monitor.shutdown();
    result
}

/// Wires the order flow to the payment gateway and the live status broadcaster.
pub async fn create_order_flow(
    config: &ServerConfig,
    db: SqliteDatabase,
    monitor: LiveMonitor,
) -> Result<BackendFlowApi, ServerError> {
    let handlers = create_live_event_handlers(monitor.clone());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let dispatcher = HttpPaymentDispatcher::new(&config.payment_url(), config.dispatch_timeout, monitor.clone())?;
    info!("💻️ Payments go to {}. Settlements are expected on {}", dispatcher.payment_url(), config.callback_url());
    Ok(OrderFlowApi::new(db, dispatcher, TokioTaskRunner, producers, monitor, config.flow_options()))
}

pub fn create_server_instance<B, D, T>(
    config: ServerConfig,
    api: OrderFlowApi<B, D, T>,
    monitor: LiveMonitor,
) -> Result<Server, ServerError>
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    let info = ConnectionInfo::from_config(&config);
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(AccessLogMiddlewareFactory::new(monitor.clone(), SERVICE_NAME))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("hs::access_log"))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::Data::new(api.clone()))
            .app_data(web::Data::new(monitor.clone()))
            .app_data(web::Data::new(info.clone()))
            .configure(configure_routes::<B, D, T>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Mounts every backend route. The app must provide `web::Data` for the order flow API, the [`LiveMonitor`] and the
/// [`ConnectionInfo`].
pub fn configure_routes<B, D, T>(cfg: &mut web::ServiceConfig)
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    let api_scope = web::scope("/api")
        .service(connection_info)
        .service(OrdersRoute::<B, D, T>::new())
        .service(CreateOrderRoute::<B, D, T>::new())
        .service(ClearOrdersRoute::<B, D, T>::new())
        .service(OrderByIdRoute::<B, D, T>::new())
        .service(RetryPaymentRoute::<B, D, T>::new())
        .service(PaymentWebhookRoute::<B, D, T>::new());
    cfg.service(HealthRoute::<B, D, T>::new()).route("/ws", web::get().to(live_session)).service(api_scope);
}
