use std::{fmt::Debug, str::FromStr};

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{
    migrate,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use super::{orders, SqliteDatabaseError};
use crate::{
    db_types::{NewOrder, Order, OrderId, PaymentStatus},
    OrderManagement,
};

/// `SqliteDatabase` is the SQLite-backed Order Store.
#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Opens a connection pool to the database at `url`, creating the database file if it does not exist yet, and
    /// brings the schema up to date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
        migrate!("./src/db/sqlite/migrations").run(&pool).await?;
        debug!("🗃️ Database {url} is ready");
        Ok(Self { url: url.to_string(), pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), SqliteDatabaseError> {
        self.pool.close().await;
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::insert_order(order, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders(&mut conn).await?;
        Ok(orders)
    }

    async fn update_payment_status(
        &self,
        order_id: &OrderId,
        status: PaymentStatus,
        only_from: &[PaymentStatus],
    ) -> Result<Option<Order>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_payment_status(order_id, status, only_from, &mut conn).await?;
        Ok(order)
    }

    async fn delete_all_orders(&self) -> Result<u64, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let count = orders::delete_all_orders(&mut conn).await?;
        info!("🗃️ {count} orders deleted");
        Ok(count)
    }

    async fn fetch_stale_pending_orders(&self, before: DateTime<Utc>) -> Result<Vec<Order>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_stale_pending_orders(before, &mut conn).await?;
        Ok(orders)
    }

    async fn ping(&self) -> Result<(), Self::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
