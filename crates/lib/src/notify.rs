//! Notifier fan-out for completed requests.
//!
//! Every request that goes through the state actor, successful or not,
//! is dispatched to the registered notifiers as independent spawned
//! tasks. A notifier that fails or stalls only affects itself; the
//! requester's response and the other notifiers never wait on it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::protocol::Request;

/// What a notifier sees for one completed request.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The completed request, response or error filled in.
    pub request: Arc<Request>,

    /// The whole root serialized after a successful mutation; `None`
    /// for fetches and failed requests. Notifiers never see the live
    /// root object.
    pub snapshot: Option<Arc<str>>,
}

impl Outcome {
    /// Whether this outcome changed the tree.
    pub fn mutated(&self) -> bool {
        self.snapshot.is_some()
    }
}

/// A collaborator invoked with every completed request.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn notify(&self, outcome: &Outcome) -> crate::Result<()>;
}

/// Insertion-ordered set of notifiers, unique by identity.
///
/// Registration happens at bootstrap, before the state actor starts;
/// the set is read-only once dispatching begins.
#[derive(Default)]
pub struct NotifierSet {
    notifiers: Vec<Arc<dyn Notify>>,
}

impl NotifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notifier. Adding the same notifier twice is a no-op.
    pub fn watch(&mut self, notifier: Arc<dyn Notify>) {
        if !self.notifiers.iter().any(|n| Arc::ptr_eq(n, &notifier)) {
            self.notifiers.push(notifier);
        }
    }

    /// Remove a notifier by identity.
    pub fn unwatch(&mut self, notifier: &Arc<dyn Notify>) {
        self.notifiers.retain(|n| !Arc::ptr_eq(n, notifier));
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Dispatch one outcome to every notifier, each as its own task.
    ///
    /// Failures are logged and swallowed. The returned handles make the
    /// tasks awaitable in tests; production callers drop them.
    pub fn dispatch(&self, outcome: &Outcome) -> Vec<JoinHandle<()>> {
        self.notifiers
            .iter()
            .map(|notifier| {
                let notifier = Arc::clone(notifier);
                let outcome = outcome.clone();
                tokio::spawn(async move {
                    if let Err(e) = notifier.notify(&outcome).await {
                        tracing::warn!("notifier failed: {e}");
                    }
                })
            })
            .collect()
    }
}
