//! Simple stateless pub-sub event handler
//!
//! Components subscribe to engine events through hooks. A hook receives the event and nothing else; it has no access
//! to the engine's internal state. Hooks can be async.
//!
//! Each [`EventHandler`] owns an mpsc channel. Producers are cheap clones of the sending half. Hook calls for one handler
//! complete in the order the events were received, so observers never see an older status after a newer one. The
//! handler runs until every producer has been dropped.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::sync::mpsc;

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size);
        Self { listener: receiver, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    pub async fn start_handler(mut self) {
        debug!("📬️ Starting event handler");
        // Only producers keep the channel open from here on
        drop(self.sender);
        while let Some(ev) = self.listener.recv().await {
            trace!("📬️ Handling event");
            // A panicking hook must not take the handler down with it
            match tokio::spawn((self.handler)(ev)).await {
                Ok(()) => trace!("📬️ Event handled"),
                Err(e) => warn!("📬️ An event hook failed to complete: {e}"),
            }
        }
        debug!("📬️ All producers have gone away. Event handler has shut down");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }
}
