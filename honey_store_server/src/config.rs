use std::{env, time::Duration};

use honey_store_engine::{FlowOptions, WebhookPolicy};
use hs_common::{
    helpers::env_or_default,
    CallbackEndpoints,
    CallbackStrategy,
    ConnectionMethod,
    ServiceLocation,
    ServiceStatus,
};
use log::*;

pub const SERVICE_NAME: &str = "backend";
/// Where the payment gateway posts settlement webhooks, relative to the backend's base URL.
pub const WEBHOOK_PATH: &str = "/api/webhook/payment";
/// The payment endpoint on the gateway, relative to its base URL.
pub const PAYMENT_PATH: &str = "/api/payment";

const DEFAULT_HS_HOST: &str = "127.0.0.1";
const DEFAULT_HS_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/honey_store.db";
const DEFAULT_PAYMENT_SERVICE_URL: &str = "http://payment-service:3002";
const DEFAULT_PUBLIC_URL: &str = "http://backend:3000";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_DISPATCH_TIMEOUT: u64 = 10;
const DEFAULT_PENDING_PAYMENT_TIMEOUT: u64 = 600;
const DEFAULT_SWEEP_INTERVAL: u64 = 60;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Base URL of the payment gateway. Payment requests go to `<payment_service_url>/api/payment`.
    pub payment_service_url: String,
    /// Base URL the gateway should use to reach this service
    pub public_url: String,
    /// A public tunnel URL. Only used with the `ngrok` connection method.
    pub ngrok_url: Option<String>,
    pub location: ServiceLocation,
    pub connection_method: ConnectionMethod,
    pub currency: String,
    /// Timeout on payment submissions to the gateway
    pub dispatch_timeout: Duration,
    pub webhook_policy: WebhookPolicy,
    /// Orders that stay `pending` for longer than this are marked as failed. Zero disables the sweep.
    pub pending_payment_timeout: Duration,
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HS_HOST.to_string(),
            port: DEFAULT_HS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            payment_service_url: DEFAULT_PAYMENT_SERVICE_URL.to_string(),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            ngrok_url: None,
            location: ServiceLocation::default(),
            connection_method: ConnectionMethod::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            dispatch_timeout: Duration::from_secs(DEFAULT_DISPATCH_TIMEOUT),
            webhook_policy: WebhookPolicy::default(),
            pending_payment_timeout: Duration::from_secs(DEFAULT_PENDING_PAYMENT_TIMEOUT),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env_or_default("HS_HOST", DEFAULT_HS_HOST.to_string());
        let port = env_or_default("HS_PORT", DEFAULT_HS_PORT);
        let database_url = env_or_default("HS_DATABASE_URL", DEFAULT_DATABASE_URL.to_string());
        let payment_service_url = env_or_default("HS_PAYMENT_SERVICE_URL", DEFAULT_PAYMENT_SERVICE_URL.to_string());
        let public_url = env_or_default("HS_PUBLIC_URL", DEFAULT_PUBLIC_URL.to_string());
        let ngrok_url = env::var("HS_NGROK_URL").ok().filter(|s| !s.trim().is_empty());
        let location = env_or_default("HS_SERVICE_LOCATION", ServiceLocation::default());
        let connection_method = env_or_default("HS_CONNECTION_METHOD", ConnectionMethod::default());
        if connection_method == ConnectionMethod::Ngrok && ngrok_url.is_none() {
            warn!("🪛️ HS_CONNECTION_METHOD is ngrok, but HS_NGROK_URL is not set. Webhooks will use {public_url}.");
        }
        let currency = env_or_default("HS_CURRENCY", DEFAULT_CURRENCY.to_string());
        let dispatch_timeout = Duration::from_secs(env_or_default("HS_DISPATCH_TIMEOUT", DEFAULT_DISPATCH_TIMEOUT));
        let webhook_policy = env_or_default("HS_WEBHOOK_POLICY", WebhookPolicy::default());
        let pending_payment_timeout =
            Duration::from_secs(env_or_default("HS_PENDING_PAYMENT_TIMEOUT", DEFAULT_PENDING_PAYMENT_TIMEOUT));
        let sweep_interval = Duration::from_secs(env_or_default("HS_SWEEP_INTERVAL", DEFAULT_SWEEP_INTERVAL).max(1));
        Self {
            host,
            port,
            database_url,
            payment_service_url,
            public_url,
            ngrok_url,
            location,
            connection_method,
            currency,
            dispatch_timeout,
            webhook_policy,
            pending_payment_timeout,
            sweep_interval,
        }
    }

    /// The full webhook URL handed to the gateway with every payment request, as resolved by the connection method.
    pub fn callback_url(&self) -> String {
        let endpoints = CallbackEndpoints {
            local: self.public_url.clone(),
            public: self.ngrok_url.clone(),
            alternative: self.public_url.clone(),
        };
        let route = self.connection_method.resolve_callback_address(&endpoints);
        format!("{}{WEBHOOK_PATH}", route.primary.trim_end_matches('/'))
    }

    pub fn payment_url(&self) -> String {
        format!("{}{PAYMENT_PATH}", self.payment_service_url.trim_end_matches('/'))
    }

    pub fn flow_options(&self) -> FlowOptions {
        FlowOptions {
            callback_url: self.callback_url(),
            currency: self.currency.clone(),
            webhook_policy: self.webhook_policy,
        }
    }

    pub fn service_status(&self) -> ServiceStatus {
        ServiceStatus::new(SERVICE_NAME, self.location, self.connection_method).with_url(&self.public_url)
    }
}
