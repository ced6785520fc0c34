use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use hs_common::PaymentStatus;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};

//--------------------------------------        OrderId        ---------------------------------------------------------
/// The opaque, store-assigned order identifier. Fresh ids are 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn random() -> Self {
        let bytes: [u8; 12] = rand::thread_rng().gen();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------      OrderItem        ---------------------------------------------------------
/// A snapshot of the product at the time the order was placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: String,
    pub in_stock: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: Product,
    pub quantity: u32,
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
/// An order as submitted by a customer. The store assigns the id, payment status and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total: f64,
    #[serde(default)]
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub shipping_address: String,
}

impl NewOrder {
    pub fn new(total: f64, customer_name: &str, customer_email: &str, shipping_address: &str) -> Self {
        Self {
            items: Vec::new(),
            total,
            customer_name: customer_name.to_string(),
            customer_email: customer_email.to_string(),
            shipping_address: shipping_address.to_string(),
        }
    }

    pub fn with_item(mut self, product: Product, quantity: u32) -> Self {
        self.items.push(OrderItem { product, quantity });
        self
    }
}

//--------------------------------------        Order       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip)]
    pub id: i64,
    #[serde(rename = "_id")]
    pub order_id: OrderId,
    pub items: Json<Vec<OrderItem>>,
    pub total: f64,
    pub customer_name: String,
    pub customer_email: String,
    pub shipping_address: String,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
