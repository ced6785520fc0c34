use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAYMENT_DELAY_MS: u64 = 2000;

/// Runtime-tunable knobs set from the admin dashboard.
///
/// Readers must fetch the config at the moment they act on it. A change only affects work that reads the config
/// afterwards; nothing already in flight is re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfig {
    pub simulate_payment_error: bool,
    pub payment_delay_ms: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { simulate_payment_error: false, payment_delay_ms: DEFAULT_PAYMENT_DELAY_MS }
    }
}

/// A partial admin config. Omitted fields keep their current value when merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulate_payment_error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_delay_ms: Option<u64>,
}

impl AdminConfigUpdate {
    pub fn simulate_payment_error(value: bool) -> Self {
        Self { simulate_payment_error: Some(value), ..Default::default() }
    }

    pub fn payment_delay_ms(value: u64) -> Self {
        Self { payment_delay_ms: Some(value), ..Default::default() }
    }
}

impl AdminConfig {
    pub fn merge(&mut self, update: AdminConfigUpdate) {
        if let Some(v) = update.simulate_payment_error {
            self.simulate_payment_error = v;
        }
        if let Some(v) = update.payment_delay_ms {
            self.payment_delay_ms = v;
        }
    }

    /// The settle delay requested from the gateway: `payment_delay_ms` rounded up to whole seconds, and never less than
    /// one second.
    pub fn settle_delay_secs(&self) -> u64 {
        self.payment_delay_ms.div_ceil(1000).max(1)
    }

    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }
}
