//! Error types for the addressable node graph.

use thiserror::Error;

/// Errors raised while navigating or mutating the node graph.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NodeError {
    /// A path segment named a field the record does not have.
    #[error("field name not found: '{field}'")]
    FieldNotFound { field: String },

    /// A sequence index parsed but fell outside `[0, len)`.
    #[error("index '{index}' out of bounds for sequence of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// A path segment addressing a sequence was not an integer.
    #[error("invalid sequence index: '{segment}'")]
    InvalidIndex { segment: String },

    /// The path continued past a value with no children.
    #[error("path not found: '{segment}' cannot be resolved inside a {kind} value")]
    PathNotFound { segment: String, kind: &'static str },

    /// Append or Remove targeted something other than a sequence.
    #[error("cannot modify a {kind} value, sequence required")]
    NotASequence { kind: &'static str },

    /// A request body failed to deserialize into the target type.
    #[error("malformed body: {reason}")]
    MalformedBody { reason: String },

    /// A located value failed to serialize.
    #[error("failed to serialize value: {reason}")]
    Serialize { reason: String },
}

impl NodeError {
    /// Check if this error means the path did not lead anywhere.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NodeError::FieldNotFound { .. } | NodeError::PathNotFound { .. }
        )
    }

    /// Check if this error is an index problem (parse or bounds).
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            NodeError::IndexOutOfRange { .. } | NodeError::InvalidIndex { .. }
        )
    }

    /// Check if this error is a type mismatch between verb and target.
    pub fn is_type_error(&self) -> bool {
        matches!(self, NodeError::NotASequence { .. })
    }

    /// Check if this error came from a request body.
    pub fn is_body_error(&self) -> bool {
        matches!(self, NodeError::MalformedBody { .. })
    }
}
