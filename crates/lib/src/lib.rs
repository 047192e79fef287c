//!
//! Vitrine: an in-memory application state tree exposed as a remotely
//! mutable resource. Any field or sequence element of the root object
//! is addressable by a slash-delimited path and one of four verbs,
//! over one-shot HTTP exchanges and persistent WebSocket streams, with
//! every completed mutation fanned out to observers and checkpointed
//! to disk.
//!
//! ## Core Concepts
//!
//! * **Nodes (`node`)**: the addressable capability set. Every value
//!   in the tree is a record, a sequence, or a scalar; application
//!   types opt in through the [`record!`] macro.
//! * **Engine (`engine`)**: resolves a path against the tree and
//!   applies a verb (fetch, replace, append, remove) to the located
//!   value.
//! * **State (`state`)**: the actor that exclusively owns the root
//!   object; all transports funnel requests through its single intake
//!   queue, so exactly one mutation is ever in flight.
//! * **Notifiers (`notify`)**: collaborators invoked with every
//!   completed request. The broadcaster (`broadcast`) fans mutations
//!   out to streaming peers and the checkpoint (`persist`) writes the
//!   post-mutation snapshot to disk.
//! * **Registry (`registry`)**: the concurrency-safe map of live
//!   streaming connections.
//! * **Transport (`transport`)**: the axum server carrying both the
//!   `/api` request/response surface and the `/socket` stream.

pub mod broadcast;
pub mod engine;
pub mod node;
pub mod notify;
pub mod persist;
pub mod protocol;
pub mod registry;
pub mod state;
pub mod transport;

pub use broadcast::Broadcaster;
pub use node::{Addressable, Node, Record, Sequence};
pub use notify::{Notify, NotifierSet, Outcome};
pub use persist::FileCheckpoint;
pub use protocol::{Request, Verb};
pub use registry::{ConnectionId, ConnectionRegistry, ConnectionSink};
pub use state::{State, StateHandle};
pub use transport::Server;

/// Result type used throughout the Vitrine library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Vitrine library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured navigation/mutation errors from the node module
    #[error(transparent)]
    Node(#[from] node::NodeError),

    /// Structured verb-application errors from the engine module
    #[error(transparent)]
    Engine(#[from] engine::EngineError),

    /// Structured actor errors from the state module
    #[error(transparent)]
    State(#[from] state::StateError),

    /// Structured server/socket errors from the transport module
    #[error(transparent)]
    Transport(#[from] transport::TransportError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Node(_) => "node",
            Error::Engine(_) => "engine",
            Error::State(_) => "state",
            Error::Transport(_) => "transport",
        }
    }

    /// Check if this error means a path did not lead anywhere.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Node(e) => e.is_not_found(),
            Error::Engine(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error was caused by a request body.
    pub fn is_body_error(&self) -> bool {
        match self {
            Error::Node(e) => e.is_body_error(),
            Error::Engine(e) => e.is_body_error(),
            _ => false,
        }
    }

    /// Check if this error is server-lifecycle related.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_server_error(),
            _ => false,
        }
    }
}
