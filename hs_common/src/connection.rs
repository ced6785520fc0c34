//! Connectivity modes and callback address resolution.
//!
//! Where a service runs (locally or in the cloud), and how it is reached (port forward, ngrok tunnel, telepresence, a
//! direct connection or not at all) determines the address the payment gateway should call back on. Each
//! [`ConnectionMethod`] is a [`CallbackStrategy`].
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid connection setting: {0}")]
pub struct InvalidConnectionSetting(String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceLocation {
    #[default]
    Local,
    Cloud,
}

impl Display for ServiceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceLocation::Local => write!(f, "local"),
            ServiceLocation::Cloud => write!(f, "cloud"),
        }
    }
}

impl FromStr for ServiceLocation {
    type Err = InvalidConnectionSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(ServiceLocation::Local),
            "cloud" => Ok(ServiceLocation::Cloud),
            _ => Err(InvalidConnectionSetting(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionMethod {
    PortForward,
    Ngrok,
    Telepresence,
    #[default]
    Direct,
    None,
}

impl Display for ConnectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionMethod::PortForward => "port-forward",
            ConnectionMethod::Ngrok => "ngrok",
            ConnectionMethod::Telepresence => "telepresence",
            ConnectionMethod::Direct => "direct",
            ConnectionMethod::None => "none",
        };
        f.write_str(s)
    }
}

impl FromStr for ConnectionMethod {
    type Err = InvalidConnectionSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "port-forward" | "portforward" | "port_forward" => Ok(ConnectionMethod::PortForward),
            "ngrok" => Ok(ConnectionMethod::Ngrok),
            "telepresence" => Ok(ConnectionMethod::Telepresence),
            "direct" => Ok(ConnectionMethod::Direct),
            "none" => Ok(ConnectionMethod::None),
            _ => Err(InvalidConnectionSetting(s.to_string())),
        }
    }
}

impl ConnectionMethod {
    /// A port-forwarded cluster service cannot open connections back to the developer's machine.
    pub fn can_receive_webhooks(&self) -> bool {
        !matches!(self, ConnectionMethod::PortForward)
    }
}

//--------------------------------------   CallbackStrategy   ---------------------------------------------------------

/// The addresses a service is known by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackEndpoints {
    /// The address the service is reachable at from inside its own network, e.g. `http://backend:3000`
    pub local: String,
    /// A publicly reachable tunnel address (e.g. ngrok), if one has been configured
    pub public: Option<String>,
    /// The address to use when the primary route fails, e.g. `http://localhost:3000`
    pub alternative: String,
}

/// The result of resolving a callback address: the primary address, and optionally a fallback to try if delivery to
/// the primary fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRoute {
    pub primary: String,
    pub fallback: Option<String>,
}

impl CallbackRoute {
    pub fn direct(primary: &str) -> Self {
        Self { primary: primary.to_string(), fallback: None }
    }
}

pub trait CallbackStrategy {
    fn resolve_callback_address(&self, endpoints: &CallbackEndpoints) -> CallbackRoute;
}

impl CallbackStrategy for ConnectionMethod {
    fn resolve_callback_address(&self, endpoints: &CallbackEndpoints) -> CallbackRoute {
        match self {
            ConnectionMethod::Ngrok => {
                let primary = endpoints.public.as_deref().filter(|s| !s.is_empty()).unwrap_or(endpoints.local.as_str());
                CallbackRoute::direct(primary)
            },
            ConnectionMethod::PortForward => CallbackRoute {
                primary: endpoints.local.clone(),
                fallback: Some(endpoints.alternative.clone()),
            },
            ConnectionMethod::Telepresence | ConnectionMethod::Direct | ConnectionMethod::None => {
                CallbackRoute::direct(&endpoints.local)
            },
        }
    }
}
