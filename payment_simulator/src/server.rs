use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use hs_common::{
    live::{live_session, AccessLogMiddlewareFactory, LiveMonitor},
    AdminConfig,
    TaskRunner,
    TokioTaskRunner,
};
use log::*;

use crate::{
    config::{SimulatorConfig, SERVICE_NAME},
    errors::{json_error_handler, SimulatorError},
    gateway::PaymentGateway,
    routes::{health, PaymentRoute},
    webhook_sender::{HttpWebhookSender, WebhookSender},
};

pub type HttpPaymentGateway = PaymentGateway<HttpWebhookSender, TokioTaskRunner>;

pub async fn run_server(config: SimulatorConfig) -> Result<(), SimulatorError> {
    let monitor = LiveMonitor::new(config.service_status(), AdminConfig::default());
    let gateway = create_gateway(&config, monitor.clone())?;
    let srv = create_server_instance(config, gateway)?;
    let result = srv.await.map_err(|e| SimulatorError::Unspecified(e.to_string()));
    monitor.shutdown();
    result
}

pub fn create_gateway(config: &SimulatorConfig, monitor: LiveMonitor) -> Result<HttpPaymentGateway, SimulatorError> {
    let sender = HttpWebhookSender::new(monitor.clone())?;
    let options = config.gateway_options();
    match &options.fallback_webhook_url {
        Some(url) => info!("💳️ Webhooks go to {}. Failures are reported to {url}", options.default_webhook_url),
        None => info!("💳️ Webhooks go to {}. Failures are not reported", options.default_webhook_url),
    }
    Ok(PaymentGateway::new(sender, TokioTaskRunner, monitor, options))
}

pub fn create_server_instance<W, T>(
    config: SimulatorConfig,
    gateway: PaymentGateway<W, T>,
) -> Result<Server, SimulatorError>
where
    W: WebhookSender,
    T: TaskRunner,
{
    let srv = HttpServer::new(move || {
        let monitor = gateway.monitor().clone();
        App::new()
            .wrap(AccessLogMiddlewareFactory::new(monitor.clone(), SERVICE_NAME))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("paysim::access_log"))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(monitor))
            .configure(configure_routes::<W, T>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Mounts every gateway route. The app must provide `web::Data` for the [`PaymentGateway`] and its [`LiveMonitor`].
pub fn configure_routes<W, T>(cfg: &mut web::ServiceConfig)
where
    W: WebhookSender,
    T: TaskRunner,
{
    cfg.service(health)
        .route("/ws", web::get().to(live_session))
        .service(web::scope("/api").service(PaymentRoute::<W, T>::new()));
}
