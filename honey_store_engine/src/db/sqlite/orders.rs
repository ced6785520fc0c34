//! Order table queries.
//!
//! These are plain functions that accept a `&mut SqliteConnection`. Callers can obtain a connection from a pool, or
//! open a transaction and pass `&mut *tx` instead.
use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{types::Json, QueryBuilder, Sqlite, SqliteConnection};

use crate::db_types::{NewOrder, Order, OrderId, PaymentStatus};

/// Inserts a new order, assigning it a fresh id. New orders are always `pending`.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order_id = OrderId::random();
    let now = Utc::now();
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                items,
                total,
                customer_name,
                customer_email,
                shipping_address,
                payment_status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(Json(order.items))
    .bind(order.total)
    .bind(order.customer_name)
    .bind(order.customer_email)
    .bind(order.shipping_address)
    .bind(PaymentStatus::Pending)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order [{}] inserted with id {}", order.order_id, order.id);
    Ok(order)
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Returns all orders, most recently created first.
pub async fn fetch_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC, id DESC").fetch_all(conn).await?;
    Ok(orders)
}

/// Sets the payment status of an order, optionally only if its current status is one of `only_from`.
pub async fn update_payment_status(
    order_id: &OrderId,
    status: PaymentStatus,
    only_from: &[PaymentStatus],
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE orders SET payment_status = ");
    builder.push_bind(status);
    builder.push(", updated_at = ");
    builder.push_bind(Utc::now());
    builder.push(" WHERE order_id = ");
    builder.push_bind(order_id.as_str());
    if !only_from.is_empty() {
        builder.push(" AND payment_status IN (");
        let mut statuses = builder.separated(", ");
        for s in only_from {
            statuses.push_bind(*s);
        }
        statuses.push_unseparated(")");
    }
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let order: Option<Order> = builder.build_query_as().fetch_optional(conn).await?;
    match &order {
        Some(o) => debug!("🗃️ Order [{order_id}] payment status is now {}", o.payment_status),
        None => debug!("🗃️ Order [{order_id}] was not updated to {status}"),
    }
    Ok(order)
}

pub async fn delete_all_orders(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders").execute(conn).await?;
    Ok(result.rows_affected())
}

pub async fn fetch_stale_pending_orders(
    before: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE payment_status = $1 AND updated_at < $2 ORDER BY id")
        .bind(PaymentStatus::Pending)
        .bind(before)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}
