//! Error types for the state actor.

use thiserror::Error;

/// Errors talking to the state actor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    /// The actor's intake queue is gone; the actor has shut down.
    #[error("state intake queue is closed")]
    IntakeClosed,

    /// The actor dropped the reply channel before answering.
    #[error("state actor dropped the reply channel")]
    ReplyDropped,
}
