//! Shared fixtures for the integration suite.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vitrine::{
    ConnectionSink, State, StateHandle,
    node::RawValue,
    notify::{Notify, Outcome},
    record,
    transport::TransportError,
};

/// Test root: one scalar of each interesting shape, a sequence, a
/// renamed field, and a field excluded from serialization.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Board {
    pub visible: bool,
    pub integer: i64,
    pub array: Vec<String>,
    #[serde(rename = "powerStatus")]
    pub power_status: String,
    #[serde(skip)]
    pub session: String,
}

record! {
    Board {
        visible: _,
        integer: _,
        array: _,
        power_status: "powerStatus",
        session: -,
    }
}

pub fn seeded_board() -> Board {
    Board {
        visible: false,
        integer: 42,
        array: vec![
            "zero".to_string(),
            "one".to_string(),
            "two".to_string(),
            "three".to_string(),
        ],
        power_status: "on".to_string(),
        session: "local".to_string(),
    }
}

pub fn spawn_state(root: Board) -> StateHandle {
    State::new(root).spawn()
}

pub fn segments(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

pub fn body(text: &str) -> Box<RawValue> {
    RawValue::from_string(text.to_string()).expect("fixture body must be valid JSON")
}

/// Sink that records every delivered message; optionally fails every
/// send to exercise the removal path.
pub struct RecordingSink {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(RecordingSink {
            sent: Mutex::new(Vec::new()),
            fail,
        })
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ConnectionSink for RecordingSink {
    async fn send(&self, message: &str) -> vitrine::Result<()> {
        if self.fail {
            return Err(TransportError::SocketSend {
                reason: "recording sink set to fail".to_string(),
            }
            .into());
        }
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn close(&self) {}
}

/// Notifier that remembers every outcome it is handed.
#[derive(Default)]
pub struct ProbeNotifier {
    outcomes: Mutex<Vec<Outcome>>,
}

impl ProbeNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notify for ProbeNotifier {
    async fn notify(&self, outcome: &Outcome) -> vitrine::Result<()> {
        self.outcomes.lock().unwrap().push(outcome.clone());
        Ok(())
    }
}

/// Poll until `condition` holds; notifier fan-out is asynchronous
/// relative to the requester's own response.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within a second");
}
