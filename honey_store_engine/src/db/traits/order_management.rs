use std::{error::Error, future::Future};

use chrono::{DateTime, Utc};

use crate::db_types::{NewOrder, Order, OrderId, PaymentStatus};

/// The Order Store. Backends that persist orders implement this trait.
///
/// Every method returns a `Send` future so that callers can move store access into background tasks.
pub trait OrderManagement: Clone + Send + Sync + 'static {
    type Error: Error + Send + Sync + 'static;

    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores a new order with a freshly generated id and a `pending` payment status.
    fn insert_order(&self, order: NewOrder) -> impl Future<Output = Result<Order, Self::Error>> + Send;

    fn fetch_order_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> impl Future<Output = Result<Option<Order>, Self::Error>> + Send;

    /// Fetches every order, newest first.
    fn fetch_orders(&self) -> impl Future<Output = Result<Vec<Order>, Self::Error>> + Send;

    /// Sets the payment status of the order and bumps its `updated_at` timestamp.
    ///
    /// If `only_from` is not empty, the update is only applied when the current status is one of the given statuses.
    /// The check and the update happen in a single statement.
    ///
    /// Returns the updated order, or `None` if no order was updated, either because it does not exist or because its
    /// status did not match.
    fn update_payment_status(
        &self,
        order_id: &OrderId,
        status: PaymentStatus,
        only_from: &[PaymentStatus],
    ) -> impl Future<Output = Result<Option<Order>, Self::Error>> + Send;

    /// Deletes every order. Returns the number of orders deleted.
    fn delete_all_orders(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Fetches `pending` orders that have not been updated since `before`.
    fn fetch_stale_pending_orders(
        &self,
        before: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Order>, Self::Error>> + Send;

    /// A cheap round trip to the database, used by health probes.
    fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
