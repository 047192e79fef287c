//! Delivery of completed requests to streaming peers.
//!
//! Routing rules:
//! 1. an error goes back to its originator only; with no originator
//!    there is no one to tell, so it is dropped;
//! 2. a fetch result is private to its originator;
//! 3. everything else (any mutation outcome, or any outcome with no
//!    originator) goes to every open connection.
//!
//! Sends happen against a snapshot of the registry taken under the
//! lock, so a slow peer never blocks connection churn. A failed send
//! marks that connection for removal but never stops delivery to the
//! rest.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    notify::{Notify, Outcome},
    protocol::Verb,
    registry::{ConnectionId, ConnectionRegistry, ConnectionSink},
};

/// Notifier that fans completed requests out over the connection
/// registry.
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Broadcaster { registry }
    }

    /// Deliver to one connection, dropping it from the registry if the
    /// write fails.
    async fn send_direct(&self, id: &ConnectionId, message: &str) {
        let Some(sink) = self.registry.get(id) else {
            warn!(connection = %id, "originator not registered, dropping reply");
            return;
        };
        if let Err(e) = sink.send(message).await {
            warn!(connection = %id, "direct reply failed: {e}");
            self.remove(vec![(id.clone(), sink)]).await;
        }
    }

    /// Deliver to every open connection, then drop the ones whose
    /// writes failed.
    async fn send_all(&self, message: &str) {
        let live = self.registry.snapshot();
        let mut failed = Vec::new();
        for (id, sink) in live {
            if let Err(e) = sink.send(message).await {
                warn!(connection = %id, "broadcast write failed: {e}");
                failed.push((id, sink));
            }
        }
        self.remove(failed).await;
    }

    async fn remove(&self, failed: Vec<(ConnectionId, Arc<dyn ConnectionSink>)>) {
        for (id, sink) in failed {
            sink.close().await;
            self.registry.deregister(&id);
            debug!(connection = %id, "connection dropped after failed write");
        }
    }
}

#[async_trait]
impl Notify for Broadcaster {
    async fn notify(&self, outcome: &Outcome) -> crate::Result<()> {
        let request = outcome.request.as_ref();
        let message = serde_json::to_string(request)?;

        match (&request.error, &request.originator) {
            (Some(_), Some(id)) => self.send_direct(id, &message).await,
            (Some(_), None) => {
                debug!("error outcome with no originator, dropped");
            }
            (None, Some(id)) if request.verb == Verb::Fetch => {
                self.send_direct(id, &message).await;
            }
            _ => self.send_all(&message).await,
        }
        Ok(())
    }
}
