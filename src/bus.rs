use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Broadcast topic with bounded capacity.
/// Messages are shared behind `Arc` so every subscriber sees the same report
/// without cloning cluster lists.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    name: &'static str,
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { name, tx }
    }

    /// Publishes `msg` and returns how many subscribers will see it.
    /// Publishing with no subscribers is not an error; the message is dropped.
    pub fn publish(&self, msg: impl Into<Arc<T>>) -> usize {
        match self.tx.send(msg.into()) {
            Ok(n) => n,
            Err(_) => {
                trace!(topic = self.name, "No subscribers, message dropped");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
