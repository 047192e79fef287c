//! Live streaming connections, keyed by opaque identity.
//!
//! The registry guards exactly one thing: the identity → transport
//! handle map. It is never held across a send; broadcast code takes a
//! snapshot under the lock and performs all writes outside it.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use rand::RngCore;

/// Opaque identity of one streaming connection.
///
/// Freshly generated identities are 32 random bytes, Base64-encoded:
/// unique with overwhelming probability and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        ConnectionId(Base64::encode_string(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        ConnectionId(value.to_string())
    }
}

/// Write half of one streaming connection.
///
/// Abstracts the concrete socket so delivery routing can be exercised
/// with recording sinks in tests.
#[async_trait]
pub trait ConnectionSink: Send + Sync {
    /// Deliver one serialized message to the peer.
    async fn send(&self, message: &str) -> crate::Result<()>;

    /// Best-effort close; errors are ignored.
    async fn close(&self);
}

/// Concurrency-safe map from connection identity to live transport
/// handle.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, Arc<dyn ConnectionSink>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: ConnectionId, sink: Arc<dyn ConnectionSink>) {
        self.connections.lock().unwrap().insert(id, sink);
    }

    pub fn deregister(&self, id: &ConnectionId) -> Option<Arc<dyn ConnectionSink>> {
        self.connections.lock().unwrap().remove(id)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<Arc<dyn ConnectionSink>> {
        self.connections.lock().unwrap().get(id).cloned()
    }

    /// Copy of the live set, taken under the lock so sends can happen
    /// outside it.
    pub fn snapshot(&self) -> Vec<(ConnectionId, Arc<dyn ConnectionSink>)> {
        self.connections
            .lock()
            .unwrap()
            .iter()
            .map(|(id, sink)| (id.clone(), Arc::clone(sink)))
            .collect()
    }

    /// Remove and return every connection, leaving the registry empty.
    pub fn drain(&self) -> Vec<(ConnectionId, Arc<dyn ConnectionSink>)> {
        self.connections.lock().unwrap().drain().collect()
    }

    pub fn len(&self) -> usize {
        self.connections.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().unwrap().is_empty()
    }
}
