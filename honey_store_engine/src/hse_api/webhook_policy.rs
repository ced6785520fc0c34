use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::db_types::PaymentStatus;

/// Decides which orders an incoming webhook may update.
///
/// The gateway does not send idempotency tokens, so duplicate or late webhooks are indistinguishable from fresh ones.
/// The policy only looks at the order's current payment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WebhookPolicy {
    /// Every webhook is applied, whatever the current status
    #[default]
    Overwrite,
    /// Webhooks for `approved` orders are acknowledged but ignored
    ProtectApproved,
    /// Only `pending` orders are updated
    PendingOnly,
}

impl WebhookPolicy {
    /// The statuses an order may be in for a webhook to apply. An empty slice means any status.
    pub fn applies_from(&self) -> &'static [PaymentStatus] {
        match self {
            WebhookPolicy::Overwrite => &[],
            WebhookPolicy::ProtectApproved => &[PaymentStatus::Pending, PaymentStatus::Rejected, PaymentStatus::Error],
            WebhookPolicy::PendingOnly => &[PaymentStatus::Pending],
        }
    }
}

impl Display for WebhookPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookPolicy::Overwrite => write!(f, "overwrite"),
            WebhookPolicy::ProtectApproved => write!(f, "protect-approved"),
            WebhookPolicy::PendingOnly => write!(f, "pending-only"),
        }
    }
}

impl FromStr for WebhookPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(WebhookPolicy::Overwrite),
            "protect-approved" => Ok(WebhookPolicy::ProtectApproved),
            "pending-only" => Ok(WebhookPolicy::PendingOnly),
            _ => Err(format!("Unknown webhook policy '{s}'")),
        }
    }
}
