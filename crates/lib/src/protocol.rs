//! Wire types shared by both transports.
//!
//! A [`Request`] carries a verb, a path into the state tree, and an
//! optional opaque body. The same value is completed in place with the
//! response payload or error description and then fanned out to
//! notifiers, so one type describes the whole lifecycle of an exchange.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::registry::ConnectionId;

/// The requested operation against a location in the state tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Fetch,
    Replace,
    Append,
    Remove,
}

impl Verb {
    /// Whether a successful application of this verb changes the tree.
    pub fn is_mutation(self) -> bool {
        !matches!(self, Verb::Fetch)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Fetch => "fetch",
            Verb::Replace => "replace",
            Verb::Append => "append",
            Verb::Remove => "remove",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One addressed operation, from intake through completion.
///
/// After processing, exactly one of `response` and `error` is set,
/// except for a successful Remove, which produces neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Identity of the streaming connection that issued this request.
    /// Never on the wire; absent for request/response callers.
    #[serde(skip)]
    pub originator: Option<ConnectionId>,

    pub verb: Verb,

    /// Path segments addressing a field or sequence element.
    #[serde(default)]
    pub path: Vec<String>,

    /// Opaque payload for Replace and Append.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Box<RawValue>>,

    /// Serialized result, set on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Box<RawValue>>,

    /// Error description, set on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Request {
    pub fn new(verb: Verb, path: Vec<String>) -> Self {
        Request {
            originator: None,
            verb,
            path,
            body: None,
            response: None,
            error: None,
        }
    }

    pub fn with_body(verb: Verb, path: Vec<String>, body: Box<RawValue>) -> Self {
        Request {
            body: Some(body),
            ..Request::new(verb, path)
        }
    }

    /// Whether processing ended in an error.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}
