//! Error types for the transport layer.

use thiserror::Error;

/// Errors from the HTTP/WebSocket server and its sockets.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// Attempted to start a server when one is already running.
    #[error("server already running on {address}")]
    AlreadyRunning { address: String },

    /// Attempted to stop or query a server that is not running.
    #[error("server not running")]
    NotRunning,

    /// Failed to bind the listen address.
    #[error("failed to bind server to {address}: {reason}")]
    Bind { address: String, reason: String },

    /// A write to a streaming peer failed.
    #[error("socket write failed: {reason}")]
    SocketSend { reason: String },
}

impl TransportError {
    /// Check if this is a server lifecycle error.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            TransportError::AlreadyRunning { .. }
                | TransportError::NotRunning
                | TransportError::Bind { .. }
        )
    }
}
