use hs_common::{ConnectionMethod, ServiceLocation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub location: ServiceLocation,
    pub connection_method: ConnectionMethod,
}
