use std::time::Duration;

use hs_common::{
    helpers::env_or_default,
    CallbackEndpoints,
    CallbackStrategy,
    ConnectionMethod,
    ServiceLocation,
    ServiceStatus,
};

pub const SERVICE_NAME: &str = "payment-service";
/// The name the order backend goes by in the request log
pub const BACKEND_NAME: &str = "backend";
/// The settlement webhook endpoint on the order backend, relative to its base URL.
pub const WEBHOOK_PATH: &str = "/api/webhook/payment";

const DEFAULT_PAYSIM_HOST: &str = "127.0.0.1";
const DEFAULT_PAYSIM_PORT: u16 = 3002;
const DEFAULT_BACKEND_URL: &str = "http://backend:3000";
const DEFAULT_ALTERNATIVE_BACKEND_URL: &str = "http://localhost:3000";
const DEFAULT_FALLBACK_TIMEOUT: u64 = 5;

#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the order backend. Used for payment requests that do not say where to send the webhook.
    pub backend_url: String,
    /// Base URL to try when a webhook cannot be delivered, if the connection method allows a fallback
    pub alternative_backend_url: String,
    pub location: ServiceLocation,
    pub connection_method: ConnectionMethod,
    /// Timeout on fallback webhook deliveries
    pub fallback_timeout: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PAYSIM_HOST.to_string(),
            port: DEFAULT_PAYSIM_PORT,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            alternative_backend_url: DEFAULT_ALTERNATIVE_BACKEND_URL.to_string(),
            location: ServiceLocation::default(),
            connection_method: ConnectionMethod::default(),
            fallback_timeout: Duration::from_secs(DEFAULT_FALLBACK_TIMEOUT),
        }
    }
}

impl SimulatorConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env_or_default("PAYSIM_HOST", DEFAULT_PAYSIM_HOST.to_string());
        let port = env_or_default("PAYSIM_PORT", DEFAULT_PAYSIM_PORT);
        let backend_url = env_or_default("PAYSIM_BACKEND_URL", DEFAULT_BACKEND_URL.to_string());
        let alternative_backend_url =
            env_or_default("PAYSIM_ALTERNATIVE_BACKEND_URL", DEFAULT_ALTERNATIVE_BACKEND_URL.to_string());
        let location = env_or_default("PAYSIM_SERVICE_LOCATION", ServiceLocation::default());
        let connection_method = env_or_default("PAYSIM_CONNECTION_METHOD", ConnectionMethod::default());
        let fallback_timeout =
            Duration::from_secs(env_or_default("PAYSIM_FALLBACK_TIMEOUT", DEFAULT_FALLBACK_TIMEOUT));
        Self { host, port, backend_url, alternative_backend_url, location, connection_method, fallback_timeout }
    }

    pub fn gateway_options(&self) -> GatewayOptions {
        let endpoints = CallbackEndpoints {
            local: self.backend_url.clone(),
            public: None,
            alternative: self.alternative_backend_url.clone(),
        };
        let route = self.connection_method.resolve_callback_address(&endpoints);
        GatewayOptions {
            default_webhook_url: webhook_url(&route.primary),
            fallback_webhook_url: route.fallback.as_deref().map(webhook_url),
            fallback_timeout: self.fallback_timeout,
        }
    }

    pub fn service_status(&self) -> ServiceStatus {
        ServiceStatus::new(SERVICE_NAME, self.location, self.connection_method)
    }
}

fn webhook_url(base: &str) -> String {
    format!("{}{WEBHOOK_PATH}", base.trim_end_matches('/'))
}

/// Where settlement outcomes go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayOptions {
    /// Used when a payment request carries no webhook URL of its own
    pub default_webhook_url: String,
    /// Where to report a failed delivery. `None` means failed deliveries are dropped.
    pub fallback_webhook_url: Option<String>,
    pub fallback_timeout: Duration,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        SimulatorConfig::default().gateway_options()
    }
}
