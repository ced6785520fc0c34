use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Type;
use thiserror::Error;

use crate::helpers::random_id;

/// Length of the random payment identifiers issued by the gateway.
pub const PAYMENT_ID_LENGTH: usize = 13;

//--------------------------------------    PaymentStatus     ---------------------------------------------------------
/// The payment status of an order, as persisted in the order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// The order was created (or a retry was requested) and no settlement has been applied yet.
    Pending,
    /// The gateway approved the payment. This is the only truly terminal status.
    Approved,
    /// The gateway rejected the payment. Retryable.
    Rejected,
    /// The payment could not even be submitted to the gateway. Retryable.
    Error,
}

impl PaymentStatus {
    /// Only `rejected` and `error` orders may be sent back to `pending` by a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Rejected | Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment status: {0}")]
pub struct ConversionError(String);

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "error" => Ok(Self::Error),
            _ => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------   SettlementStatus   ---------------------------------------------------------
/// The outcome the gateway reports in a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Approved,
    Rejected,
    Error,
}

impl SettlementStatus {
    /// Lenient parse of the status string carried by an incoming webhook. Anything that isn't recognised is treated as
    /// a rejection.
    pub fn from_webhook_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => Self::Approved,
            "error" => Self::Error,
            _ => Self::Rejected,
        }
    }

    /// `approved` stays `approved`, every other outcome is stored as `rejected`.
    pub fn as_payment_status(&self) -> PaymentStatus {
        match self {
            Self::Approved => PaymentStatus::Approved,
            Self::Rejected | Self::Error => PaymentStatus::Rejected,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Approved => "Payment approved successfully",
            Self::Rejected => "Payment rejected",
            Self::Error => "Payment processing failed",
        }
    }
}

impl Display for SettlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => f.write_str("approved"),
            Self::Rejected => f.write_str("rejected"),
            Self::Error => f.write_str("error"),
        }
    }
}

//--------------------------------------    PaymentRequest    ---------------------------------------------------------
/// The payment data sent to the gateway. Every field is lenient on input so that a request with a missing order id
/// still reaches the gateway, which decides what to do with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub customer_email: String,
}

impl PaymentData {
    pub fn new<S: Into<String>>(order_id: S, amount: f64, currency: &str, customer_email: &str) -> Self {
        Self {
            order_id: Some(order_id.into()),
            amount,
            currency: currency.to_string(),
            customer_email: customer_email.to_string(),
        }
    }
}

/// A request to the payment gateway.
///
/// The canonical shape carries a callback URL, a settle delay in seconds and a `data` envelope. Legacy clients send the
/// order id, amount and email at the top level instead, and those fields are still honoured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Settle delay, in whole seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PaymentData>,
    #[serde(default, rename = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, rename = "customerEmail", skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

impl PaymentRequest {
    pub fn new(webhook_url: &str, sleep_secs: u64, data: PaymentData) -> Self {
        Self { webhook_url: Some(webhook_url.to_string()), sleep: Some(sleep_secs), data: Some(data), ..Default::default() }
    }

    /// The order id this payment is for. The nested `data.orderId` wins over the legacy top-level `orderId`. Empty
    /// strings count as missing.
    pub fn order_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.order_id.as_deref())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.order_id.as_deref().filter(|s| !s.trim().is_empty()))
    }

    pub fn amount(&self) -> f64 {
        self.data.as_ref().map(|d| d.amount).or(self.amount).unwrap_or_default()
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.data
            .as_ref()
            .map(|d| d.customer_email.as_str())
            .filter(|s| !s.is_empty())
            .or(self.customer_email.as_deref())
    }
}

//--------------------------------------    PaymentResponse   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStatus {
    Processing,
    Approved,
    Rejected,
    Error,
}

/// The gateway's immediate answer to a payment request. Settlement follows asynchronously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: String,
    pub status: GatewayStatus,
    pub message: String,
}

impl PaymentResponse {
    pub fn processing() -> Self {
        Self {
            payment_id: random_id(PAYMENT_ID_LENGTH),
            status: GatewayStatus::Processing,
            message: "Payment is being processed".to_string(),
        }
    }
}

//--------------------------------------    PaymentWebhook    ---------------------------------------------------------
/// The canonical settlement notification. This is also the flat wire shape the gateway sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWebhook {
    pub order_id: String,
    pub payment_id: String,
    pub status: SettlementStatus,
    pub message: String,
}

impl PaymentWebhook {
    /// A settlement outcome with a freshly generated payment id.
    pub fn new<S: Into<String>>(order_id: S, status: SettlementStatus, message: &str) -> Self {
        Self { order_id: order_id.into(), payment_id: random_id(PAYMENT_ID_LENGTH), status, message: message.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookPayloadError {
    #[error("Webhook payload is not in a recognised shape. {0}")]
    Malformed(String),
    #[error("Webhook payload does not contain an order id")]
    MissingOrderId,
}

/// A webhook as it arrives on the wire, in one of the two accepted shapes.
///
/// * Flat: `{orderId, paymentId, status, message}`
/// * Enveloped: `{payment_id, data: {orderId, ...}}`. The status is assumed to be `approved` when omitted.
///
/// Call [`WebhookPayload::normalize`] to obtain the canonical [`PaymentWebhook`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Enveloped(EnvelopedPayload),
    Flat(FlatPayload),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatPayload {
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopedPayload {
    #[serde(alias = "paymentId")]
    pub payment_id: Option<String>,
    pub status: Option<String>,
    pub data: EnvelopeData,
    /// Flat fields sent alongside an unrelated `data` object.
    #[serde(rename = "orderId", alias = "order_id", default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EnvelopedPayload {
    fn has_inner_order_id(&self) -> bool {
        self.data.order_id.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeData {
    #[serde(alias = "order_id")]
    pub order_id: Option<String>,
    #[serde(alias = "payment_id")]
    pub payment_id: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
}

impl WebhookPayload {
    pub fn from_json(value: Value) -> Result<Self, WebhookPayloadError> {
        serde_json::from_value(value).map_err(|e| WebhookPayloadError::Malformed(e.to_string()))
    }

    /// Collapses either wire shape into the canonical [`PaymentWebhook`]. Fails if no order id can be extracted.
    pub fn normalize(self) -> Result<PaymentWebhook, WebhookPayloadError> {
        let (order_id, payment_id, status, message) = match self {
            Self::Flat(p) => {
                let status = p.status.as_deref().map(SettlementStatus::from_webhook_str).unwrap_or(SettlementStatus::Rejected);
                (p.order_id, p.payment_id, status, p.message)
            },
            Self::Enveloped(p) if !p.has_inner_order_id() && p.order_id.is_some() => {
                let status = p.status.as_deref().map(SettlementStatus::from_webhook_str).unwrap_or(SettlementStatus::Rejected);
                (p.order_id, p.payment_id, status, p.message)
            },
            Self::Enveloped(p) => {
                let status = p
                    .data
                    .status
                    .as_deref()
                    .or(p.status.as_deref())
                    .map(SettlementStatus::from_webhook_str)
                    .unwrap_or(SettlementStatus::Approved);
                (p.data.order_id, p.payment_id.or(p.data.payment_id), status, p.data.message)
            },
        };
        let order_id = order_id.filter(|s| !s.trim().is_empty()).ok_or(WebhookPayloadError::MissingOrderId)?;
        let message = message.unwrap_or_else(|| status.default_message().to_string());
        Ok(PaymentWebhook { order_id, payment_id: payment_id.unwrap_or_default(), status, message })
    }
}
