//! The state actor: exclusive owner of the root object.
//!
//! All traffic, request/response and streaming alike, funnels into one
//! mpsc intake queue with a single consumer task. That task is the
//! only code that ever touches the root, so exactly one mutation is in
//! flight at any instant and requests apply in enqueue order. This is
//! a correctness requirement, not an optimization: the engine itself
//! is not synchronized.

use std::{fmt, sync::Arc};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::{
    engine,
    node::Addressable,
    notify::{Notify, NotifierSet, Outcome},
    protocol::Request,
};

pub mod errors;

pub use errors::StateError;

/// Depth of the shared intake queue.
const INTAKE_DEPTH: usize = 64;

/// Commands consumed by the state actor.
pub enum StateCommand {
    /// Apply one request against the root and fan out the outcome.
    Apply {
        request: Request,
        /// Present for request/response callers awaiting the completed
        /// request; streaming callers get their replies through the
        /// broadcaster instead.
        respond_to: Option<oneshot::Sender<Arc<Request>>>,
    },
    /// Stop the actor.
    Shutdown,
}

// oneshot senders have no Debug impl.
impl fmt::Debug for StateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateCommand::Apply { request, respond_to } => f
                .debug_struct("Apply")
                .field("request", request)
                .field("awaited", &respond_to.is_some())
                .finish(),
            StateCommand::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// Owns the root object and the notifier set until spawned.
pub struct State<R> {
    root: R,
    notifiers: NotifierSet,
}

impl<R> State<R>
where
    R: Addressable + Send + 'static,
{
    pub fn new(root: R) -> Self {
        State {
            root,
            notifiers: NotifierSet::new(),
        }
    }

    /// Register a notifier. Bootstrap-time only; the set is frozen once
    /// the actor starts.
    pub fn watch(&mut self, notifier: Arc<dyn Notify>) {
        self.notifiers.watch(notifier);
    }

    pub fn unwatch(&mut self, notifier: &Arc<dyn Notify>) {
        self.notifiers.unwatch(notifier);
    }

    /// Start the actor task and return a cloneable handle to it.
    pub fn spawn(self) -> StateHandle {
        let (tx, rx) = mpsc::channel(INTAKE_DEPTH);
        tokio::spawn(run(self.root, self.notifiers, rx));
        StateHandle { tx }
    }
}

async fn run<R>(mut root: R, notifiers: NotifierSet, mut intake: mpsc::Receiver<StateCommand>)
where
    R: Addressable + Send + 'static,
{
    while let Some(command) = intake.recv().await {
        match command {
            StateCommand::Apply { request, respond_to } => {
                let outcome = settle(request, &mut root);
                notifiers.dispatch(&outcome);
                if let Some(respond_to) = respond_to {
                    let _ = respond_to.send(Arc::clone(&outcome.request));
                }
            }
            StateCommand::Shutdown => break,
        }
    }
    debug!("state actor stopped");
}

/// Apply one request to the root and build the outcome for fan-out.
///
/// Afterwards exactly one of `response`/`error` is set, except for a
/// successful Remove which sets neither.
fn settle(mut request: Request, root: &mut dyn Addressable) -> Outcome {
    match engine::apply(request.verb, &request.path, request.body.as_deref(), root) {
        Ok(Some(payload)) => match serde_json::value::RawValue::from_string(payload) {
            Ok(raw) => request.response = Some(raw),
            Err(e) => request.error = Some(e.to_string()),
        },
        Ok(None) => {}
        Err(e) => {
            debug!(verb = %request.verb, path = ?request.path, "request failed: {e}");
            request.error = Some(e.to_string());
        }
    }

    let snapshot = if request.verb.is_mutation() && !request.failed() {
        match root.to_json() {
            Ok(json) => Some(Arc::from(json.as_str())),
            Err(e) => {
                // A snapshot failure must not downgrade the already
                // applied mutation; the checkpoint just skips a beat.
                warn!("failed to snapshot root after mutation: {e}");
                None
            }
        }
    } else {
        None
    };

    Outcome {
        request: Arc::new(request),
        snapshot,
    }
}

/// Cloneable entry point to the state actor.
#[derive(Clone)]
pub struct StateHandle {
    tx: mpsc::Sender<StateCommand>,
}

impl StateHandle {
    /// Enqueue a request and await its completion (request/response
    /// transport).
    pub async fn request(&self, request: Request) -> Result<Arc<Request>, StateError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(StateCommand::Apply {
                request,
                respond_to: Some(tx),
            })
            .await
            .map_err(|_| StateError::IntakeClosed)?;
        rx.await.map_err(|_| StateError::ReplyDropped)
    }

    /// Enqueue a request without awaiting it (streaming transport; the
    /// reply travels through the broadcaster).
    pub async fn submit(&self, request: Request) -> Result<(), StateError> {
        self.tx
            .send(StateCommand::Apply {
                request,
                respond_to: None,
            })
            .await
            .map_err(|_| StateError::IntakeClosed)
    }

    /// Ask the actor to stop. Queued requests ahead of the shutdown
    /// still apply.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(StateCommand::Shutdown).await;
    }
}
