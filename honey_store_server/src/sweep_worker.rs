use std::time::Duration;

use honey_store_engine::{db_types::Order, OrderFlowApi, OrderManagement, PaymentDispatcher};
use hs_common::TaskRunner;
use log::*;
use tokio::task::JoinHandle;

/// Starts the stale payment sweep. Orders that have been `pending` for longer than `pending_timeout` are moved to
/// `error` so that customers can retry them. Returns `None` if `pending_timeout` is zero, which disables the sweep.
///
/// Do not await the returned JoinHandle, as it will run indefinitely.
pub fn start_sweep_worker<B, D, T>(
    api: OrderFlowApi<B, D, T>,
    pending_timeout: Duration,
    interval: Duration,
) -> Option<JoinHandle<()>>
where
    B: OrderManagement,
    D: PaymentDispatcher,
    T: TaskRunner,
{
    if pending_timeout.is_zero() {
        info!("🕰️ Stale payment sweep is disabled. Orders without a settlement will stay pending.");
        return None;
    }
    let handle = tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        let secs = pending_timeout.as_secs();
        info!("🕰️ Stale payment sweep started. Payments pending for more than {secs}s will be failed.");
        loop {
            timer.tick().await;
            trace!("🕰️ Running stale payment sweep");
            match api.expire_stale_payments(pending_timeout).await {
                Ok(expired) if expired.is_empty() => {},
                Ok(expired) => {
                    info!("🕰️ {} stale payments marked as failed", expired.len());
                    debug!("🕰️ Failed orders: {}", order_list(&expired));
                },
                Err(e) => {
                    error!("🕰️ Error running stale payment sweep: {e}");
                },
            }
        }
    });
    Some(handle)
}

fn order_list(orders: &[Order]) -> String {
    orders
        .iter()
        .map(|o| format!("[{}] total: {:.2} customer: {}", o.order_id, o.total, o.customer_email))
        .collect::<Vec<String>>()
        .join(", ")
}
