use std::collections::HashMap;

use cucumber::World;
use honey_store_engine::{
    db_types::{Order, OrderId},
    test_utils::{TestFlowApi, TestSystem},
    OrderFlowError,
};

#[derive(Default, Debug, World)]
pub struct OrderWorld {
    pub system: Option<TestSystem>,
    /// Orders are referred to by a short label in the feature files
    pub orders: HashMap<String, OrderId>,
    pub last_error: Option<OrderFlowError>,
    pub last_deleted: Option<u64>,
}

impl OrderWorld {
    pub fn system(&self) -> &TestSystem {
        self.system.as_ref().expect("System not initialised. Did you forget 'Given a fresh install'?")
    }

    pub fn api(&self) -> &TestFlowApi {
        &self.system().api
    }

    pub fn order_id(&self, label: &str) -> OrderId {
        self.orders.get(label).cloned().unwrap_or_else(|| panic!("No order labelled {label}"))
    }

    pub async fn order(&self, label: &str) -> Order {
        let id = self.order_id(label);
        self.api().fetch_order(&id).await.expect("Error fetching order")
    }
}
