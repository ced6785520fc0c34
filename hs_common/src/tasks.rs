//! Fire-and-forget background work.
//!
//! Both services hand off slow work (dispatching a payment, settling one) so that the HTTP response goes out first.
//! Production code uses [`TokioTaskRunner`], which spawns each task on the runtime. Tests use [`QueuedTaskRunner`] so
//! that they decide exactly when the deferred work runs.
use std::{
    collections::VecDeque,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

use log::*;

pub type BoxedTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

pub trait TaskRunner: Clone + Send + Sync + 'static {
    /// Schedules `task` to run after the caller has returned. The runner never reports the task's outcome.
    fn submit(&self, task: BoxedTask);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTaskRunner;

impl TaskRunner for TokioTaskRunner {
    fn submit(&self, task: BoxedTask) {
        tokio::spawn(task);
    }
}

/// Holds submitted tasks until [`QueuedTaskRunner::run_pending`] is called.
#[derive(Clone, Default)]
pub struct QueuedTaskRunner {
    queue: Arc<Mutex<VecDeque<BoxedTask>>>,
}

impl QueuedTaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or_else(|e| e.into_inner().len())
    }

    fn pop(&self) -> Option<BoxedTask> {
        match self.queue.lock() {
            Ok(mut q) => q.pop_front(),
            Err(e) => e.into_inner().pop_front(),
        }
    }

    /// Runs queued tasks in submission order, including any that are submitted while this runs. Returns the number of
    /// tasks that ran.
    pub async fn run_pending(&self) -> usize {
        let mut count = 0;
        while let Some(task) = self.pop() {
            task.await;
            count += 1;
        }
        trace!("🔄️ Ran {count} queued tasks");
        count
    }
}

impl TaskRunner for QueuedTaskRunner {
    fn submit(&self, task: BoxedTask) {
        match self.queue.lock() {
            Ok(mut q) => q.push_back(task),
            Err(e) => e.into_inner().push_back(task),
        }
    }
}
