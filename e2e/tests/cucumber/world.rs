use std::{collections::HashMap, fmt::Debug, future::Future, sync::mpsc::channel, time::Duration};

use actix_web::dev::ServerHandle;
use cucumber::World;
use honey_store_engine::{
    test_utils::prepare_env::{create_database, random_db_path},
    SqliteDatabase,
};
use honey_store_server::{
    config::ServerConfig,
    server::{create_order_flow, create_server_instance},
    sweep_worker::start_sweep_worker,
};
use hs_common::{live::LiveMonitor, AdminConfig};
use log::*;
use payment_simulator::{config::SimulatorConfig, server as simulator};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tokio::task::JoinHandle;

/// Nothing listens here, so every request to it fails straight away.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

#[derive(World)]
pub struct HoneyWorld {
    pub backend: ServerConfig,
    pub simulator: SimulatorConfig,
    pub backend_monitor: Option<LiveMonitor>,
    pub simulator_monitor: Option<LiveMonitor>,
    pub backend_handle: Option<ServerHandle>,
    pub simulator_handle: Option<ServerHandle>,
    pub sweeper: Option<JoinHandle<()>>,
    /// Orders are referred to by a short label in the feature files
    pub orders: HashMap<String, String>,
    /// The `updatedAt` timestamps noted down during a scenario, by order label
    pub timestamps: HashMap<String, String>,
    pub response: Option<(StatusCode, String)>,
}

impl Debug for HoneyWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HoneyWorld (backend: {}, gateway: {})", self.backend_url(), self.simulator_url())
    }
}

fn random_port() -> u16 {
    20000 + rand::random::<u16>() % 10_000
}

impl Default for HoneyWorld {
    fn default() -> Self {
        let _ = env_logger::try_init().ok();
        let backend_port = random_port();
        let simulator_port = match random_port() {
            p if p == backend_port => p + 1,
            p => p,
        };
        let backend_url = format!("http://127.0.0.1:{backend_port}");
        let backend = ServerConfig {
            database_url: random_db_path(),
            payment_service_url: format!("http://127.0.0.1:{simulator_port}"),
            public_url: backend_url.clone(),
            ..ServerConfig::new("127.0.0.1", backend_port)
        };
        let simulator = SimulatorConfig {
            backend_url,
            alternative_backend_url: UNREACHABLE_URL.to_string(),
            ..SimulatorConfig::new("127.0.0.1", simulator_port)
        };
        Self {
            backend,
            simulator,
            backend_monitor: None,
            simulator_monitor: None,
            backend_handle: None,
            simulator_handle: None,
            sweeper: None,
            orders: HashMap::new(),
            timestamps: HashMap::new(),
            response: None,
        }
    }
}

impl HoneyWorld {
    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.backend.host, self.backend.port)
    }

    pub fn simulator_url(&self) -> String {
        format!("http://{}:{}", self.simulator.host, self.simulator.port)
    }

    pub fn backend_monitor(&self) -> &LiveMonitor {
        self.backend_monitor.as_ref().expect("Backend not started")
    }

    pub fn simulator_monitor(&self) -> &LiveMonitor {
        self.simulator_monitor.as_ref().expect("Payment simulator not started")
    }

    /// The order id for a label. Labels that were never used for an order are taken to be order ids themselves.
    pub fn order_id(&self, label: &str) -> String {
        self.orders.get(label).cloned().unwrap_or_else(|| label.to_string())
    }

    pub async fn start_services(&mut self) {
        let db_url = self.backend.database_url.clone();
        create_database(&db_url).await;
        let db = SqliteDatabase::new_with_url(&db_url, 5).await.expect("Error creating connection to database");
        debug!("🌍️ Created database: {db_url}");

        let backend_monitor = LiveMonitor::new(self.backend.service_status(), AdminConfig::default());
        let api = create_order_flow(&self.backend, db, backend_monitor.clone()).await.expect("Error creating order flow");
        self.sweeper = start_sweep_worker(api.clone(), self.backend.pending_payment_timeout, self.backend.sweep_interval);
        let config = self.backend.clone();
        let monitor = backend_monitor.clone();
        info!("🌍️ Starting backend on {}", self.backend_url());
        self.backend_handle = Some(spawn_server(async move { create_server_instance(config, api, monitor) }).await);
        self.backend_monitor = Some(backend_monitor);

        let simulator_monitor = LiveMonitor::new(self.simulator.service_status(), AdminConfig::default());
        let gateway =
            simulator::create_gateway(&self.simulator, simulator_monitor.clone()).expect("Error creating gateway");
        let config = self.simulator.clone();
        info!("🌍️ Starting payment simulator on {}", self.simulator_url());
        self.simulator_handle = Some(spawn_server(async move { simulator::create_server_instance(config, gateway) }).await);
        self.simulator_monitor = Some(simulator_monitor);
        info!("🌍️ Services started");
    }

    pub async fn stop_services(&mut self) {
        if let Some(h) = self.sweeper.take() {
            h.abort();
        }
        for handle in [self.backend_handle.take(), self.simulator_handle.take()].into_iter().flatten() {
            handle.stop(true).await;
        }
        for monitor in [self.backend_monitor.take(), self.simulator_monitor.take()].into_iter().flatten() {
            monitor.shutdown();
        }
        info!("🌍️ Services stopped");
    }

    pub async fn backend_request<F>(&self, method: Method, path: &str, req: F) -> (StatusCode, String)
    where F: FnOnce(RequestBuilder) -> RequestBuilder {
        self.request(method, &format!("{}{path}", self.backend_url()), req).await
    }

    pub async fn simulator_request<F>(&self, method: Method, path: &str, req: F) -> (StatusCode, String)
    where F: FnOnce(RequestBuilder) -> RequestBuilder {
        self.request(method, &format!("{}{path}", self.simulator_url()), req).await
    }

    async fn request<F>(&self, method: Method, url: &str, req: F) -> (StatusCode, String)
    where F: FnOnce(RequestBuilder) -> RequestBuilder {
        debug!("🌍️ Querying {method} {url}");
        let client = Client::new();
        let request = req(client.request(method, url).header("X-Request-Source", "frontend"));
        let res = request.send().await.expect("Error getting response");
        let code = res.status();
        let body = res.text().await.expect("Error parsing response body");
        (code, body)
    }

    /// Fetches the order with the given label from the backend.
    pub async fn order(&self, label: &str) -> Value {
        let id = self.order_id(label);
        let (code, body) = self.backend_request(Method::GET, &format!("/api/orders/{id}"), |req| req).await;
        assert_eq!(code, StatusCode::OK, "Could not fetch order {label}: {body}");
        serde_json::from_str(&body).expect("Order is not valid JSON")
    }

    pub async fn payment_status(&self, label: &str) -> String {
        self.order(label).await["paymentStatus"].as_str().expect("Order has no paymentStatus").to_string()
    }

    pub async fn orders(&self) -> Vec<Value> {
        let (code, body) = self.backend_request(Method::GET, "/api/orders", |req| req).await;
        assert_eq!(code, StatusCode::OK);
        let list: Value = serde_json::from_str(&body).expect("Order list is not valid JSON");
        list["orders"].as_array().cloned().expect("No orders array in the response")
    }
}

async fn spawn_server<F, E>(create: F) -> ServerHandle
where
    F: Future<Output = Result<actix_web::dev::Server, E>> + Send + 'static,
    E: Debug,
{
    let (tx, rx) = channel();
    tokio::spawn(async move {
        let srv = create.await.expect("Error creating server instance");
        let _res = tx.send(srv.handle());
        match srv.await {
            Ok(_) => info!("🌍️ Server shut down"),
            Err(e) => warn!("🌍️ Server error: {e}"),
        }
    });
    rx.recv().expect("Server did not start")
}

/// Polls `check` every 100ms until it returns true or `timeout` elapses. Returns the final result of `check`.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
