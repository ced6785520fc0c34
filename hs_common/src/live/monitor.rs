use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, RwLock},
};

use log::*;
use thiserror::Error;
use tokio::sync::broadcast;

use super::events::{ClientEvent, LiveEvent};
use crate::{AdminConfig, AdminConfigUpdate, RequestLog, ServiceStatus};

pub const REQUEST_LOG_CAPACITY: usize = 100;
pub const LIVE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Error)]
pub enum MonitorError {
    #[error("The live monitor has been shut down")]
    ShutDown,
    #[error("Could not decode client event. {0}")]
    InvalidClientEvent(String),
    #[error("Could not encode live event. {0}")]
    EncodingError(String),
}

struct MonitorState {
    status: RwLock<ServiceStatus>,
    admin_config: RwLock<AdminConfig>,
    logs: Mutex<VecDeque<RequestLog>>,
    sender: Mutex<Option<broadcast::Sender<LiveEvent>>>,
}

/// The process-wide observability state of a service: its health, the admin config, and the recent request log. Every
/// change is fanned out to the currently connected observers.
///
/// `LiveMonitor` is cheap to clone; all clones share the same state. Create one at process start, pass it to every
/// component that needs it, and call [`LiveMonitor::shutdown`] when the process stops.
///
/// Delivery is best-effort. An observer that falls too far behind loses the oldest events, and nothing is replayed to
/// an observer besides the snapshot it receives on connecting.
#[derive(Clone)]
pub struct LiveMonitor {
    state: Arc<MonitorState>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl LiveMonitor {
    pub fn new(status: ServiceStatus, admin_config: AdminConfig) -> Self {
        let (sender, _) = broadcast::channel(LIVE_CHANNEL_CAPACITY);
        let state = MonitorState {
            status: RwLock::new(status),
            admin_config: RwLock::new(admin_config),
            logs: Mutex::new(VecDeque::with_capacity(REQUEST_LOG_CAPACITY)),
            sender: Mutex::new(Some(sender)),
        };
        Self { state: Arc::new(state) }
    }

    pub fn service_status(&self) -> ServiceStatus {
        self.state.status.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Sets the health flag. Observers are only notified when the flag actually changes.
    pub fn set_healthy(&self, healthy: bool) {
        let changed = {
            let mut status = self.state.status.write().unwrap_or_else(|e| e.into_inner());
            if status.healthy == healthy {
                None
            } else {
                status.healthy = healthy;
                Some(status.clone())
            }
        };
        if let Some(status) = changed {
            info!("📡️ {} is now {}", status.name, if healthy { "healthy" } else { "unhealthy" });
            self.publish(LiveEvent::ServiceStatus(status));
        }
    }

    /// The admin config as it is right now.
    pub fn admin_config(&self) -> AdminConfig {
        *self.state.admin_config.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Merges `update` into the admin config and broadcasts the result.
    pub fn update_admin_config(&self, update: AdminConfigUpdate) -> AdminConfig {
        let config = {
            let mut config = self.state.admin_config.write().unwrap_or_else(|e| e.into_inner());
            config.merge(update);
            *config
        };
        info!("📡️ Admin config updated: {config:?}");
        self.publish(LiveEvent::AdminConfig(config));
        config
    }

    /// Appends to the request log, evicting the oldest entry when full, and broadcasts the new entry.
    pub fn record_request(&self, entry: RequestLog) {
        {
            let mut logs = lock(&self.state.logs);
            while logs.len() >= REQUEST_LOG_CAPACITY {
                logs.pop_front();
            }
            logs.push_back(entry.clone());
        }
        self.publish(LiveEvent::RequestLog(entry));
    }

    /// The request log, oldest first.
    pub fn request_logs(&self) -> Vec<RequestLog> {
        lock(&self.state.logs).iter().cloned().collect()
    }

    /// Sends `event` to every connected observer. Events published while nobody is listening are dropped.
    pub fn publish(&self, event: LiveEvent) {
        let sender = lock(&self.state.sender);
        match sender.as_ref() {
            Some(tx) => match tx.send(event) {
                Ok(n) => trace!("📡️ Event sent to {n} observers"),
                Err(e) => trace!("📡️ No observers for {} event", e.0.name()),
            },
            None => debug!("📡️ Monitor is shut down. Dropping {} event", event.name()),
        }
    }

    pub fn subscribe(&self) -> Result<broadcast::Receiver<LiveEvent>, MonitorError> {
        lock(&self.state.sender).as_ref().map(|tx| tx.subscribe()).ok_or(MonitorError::ShutDown)
    }

    /// The events a new observer receives before any live updates.
    pub fn snapshot(&self) -> Vec<LiveEvent> {
        vec![
            LiveEvent::ServiceStatus(self.service_status()),
            LiveEvent::AdminConfig(self.admin_config()),
            LiveEvent::RequestLogs(self.request_logs()),
        ]
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.state.sender).as_ref().map(|tx| tx.receiver_count()).unwrap_or(0)
    }

    pub fn handle_client_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::UpdateAdminConfig(update) => {
                self.update_admin_config(update);
            },
        }
    }

    /// Closes the push channel. Connected observers are disconnected and new subscriptions fail.
    pub fn shutdown(&self) {
        {
            let mut status = self.state.status.write().unwrap_or_else(|e| e.into_inner());
            status.healthy = false;
            status.enabled = false;
        }
        if lock(&self.state.sender).take().is_some() {
            info!("📡️ Live monitor shut down");
        }
    }
}
