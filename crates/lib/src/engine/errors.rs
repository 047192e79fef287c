//! Error types for the request engine.

use thiserror::Error;

use crate::node::NodeError;

/// Errors produced while applying a request to the state tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Navigation or mutation error from the node graph.
    #[error(transparent)]
    Node(#[from] NodeError),

    /// Replace and Append require a body.
    #[error("body is empty")]
    EmptyBody,

    /// Remove needs at least the index segment.
    #[error("cannot remove with an empty path")]
    EmptyRemovePath,

    /// The transport mapped a request to no known verb.
    #[error("unsupported verb '{verb}'")]
    UnsupportedVerb { verb: String },
}

impl EngineError {
    /// Check if this error means the path did not lead anywhere.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::Node(e) if e.is_not_found())
    }

    /// Check if this error was caused by the request body.
    pub fn is_body_error(&self) -> bool {
        match self {
            EngineError::Node(e) => e.is_body_error(),
            EngineError::EmptyBody => true,
            _ => false,
        }
    }
}
