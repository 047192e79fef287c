//! The generic request engine: verb semantics over the node graph.
//!
//! [`apply`] is the single entry point used by every transport. It
//! resolves the request path against the root object, applies the verb
//! to the located value, and returns the serialized result. The engine
//! holds no state of its own; the caller owns the root and decides what
//! to do with the outcome.

use crate::{
    node::{Addressable, Node, NodeError, RawValue},
    protocol::Verb,
};

pub mod errors;
pub mod resolve;

pub use errors::EngineError;
pub use resolve::resolve;

use resolve::checked_index;

/// Apply one verb to the tree rooted at `root`.
///
/// Returns the serialized result payload, or `None` for verbs that
/// produce no payload (Remove).
///
/// - **Fetch**: resolve the full path and serialize the located value.
/// - **Replace**: resolve the full path and overwrite the located value
///   from `body`; returns the new value serialized.
/// - **Append**: resolve the full path to a sequence and push a new
///   element deserialized from `body`; returns the appended element
///   serialized on its own, not the whole sequence.
/// - **Remove**: the trailing segment is the index to delete, the rest
///   of the path must resolve to the owning sequence; later elements
///   shift down by one.
pub fn apply(
    verb: Verb,
    path: &[String],
    body: Option<&RawValue>,
    root: &mut dyn Addressable,
) -> Result<Option<String>, EngineError> {
    match verb {
        Verb::Fetch => {
            let located = resolve(root, path)?;
            Ok(Some(located.to_json()?))
        }
        Verb::Replace => {
            let located = resolve(root, path)?;
            let body = body.ok_or(EngineError::EmptyBody)?;
            located.replace_from(body)?;
            Ok(Some(located.to_json()?))
        }
        Verb::Append => {
            let located = resolve(root, path)?;
            match located.node() {
                Node::Sequence(sequence) => {
                    let body = body.ok_or(EngineError::EmptyBody)?;
                    Ok(Some(sequence.append_from(body)?))
                }
                other => Err(NodeError::NotASequence { kind: other.kind() }.into()),
            }
        }
        Verb::Remove => {
            let (leaf, rest) = path.split_last().ok_or(EngineError::EmptyRemovePath)?;
            let located = resolve(root, rest)?;
            match located.node() {
                Node::Sequence(sequence) => {
                    let index = checked_index(leaf, sequence.len())?;
                    sequence.remove_at(index);
                    Ok(None)
                }
                other => Err(NodeError::NotASequence { kind: other.kind() }.into()),
            }
        }
    }
}
