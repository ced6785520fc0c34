mod order_management;

pub use order_management::OrderManagement;
