use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    connection::{ConnectionMethod, ServiceLocation},
    helpers::random_id,
};

/// Volatile per-service health information. Only used for observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub name: String,
    pub healthy: bool,
    pub location: ServiceLocation,
    pub connection_method: ConnectionMethod,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ServiceStatus {
    pub fn new(name: &str, location: ServiceLocation, connection_method: ConnectionMethod) -> Self {
        Self { name: name.to_string(), healthy: true, location, connection_method, enabled: true, url: None }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

//--------------------------------------      RequestLog      ---------------------------------------------------------
/// A single entry in the request log ring buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub destination: String,
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Duration of the call, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl RequestLog {
    pub fn new(source: &str, destination: &str, method: &str, path: &str) -> Self {
        Self {
            id: random_id(11),
            timestamp: Utc::now(),
            source: source.to_string(),
            destination: destination.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            status: None,
            duration: None,
        }
    }

    pub fn completed(mut self, status: u16, elapsed: Duration) -> Self {
        self.status = Some(status);
        self.duration = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        self
    }
}
