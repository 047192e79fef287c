//! Path resolution over the addressable node graph.

use crate::node::{Addressable, Node, NodeError, fields};

/// Walk `path` from `root` one segment at a time and return the located
/// value. An empty path locates the root itself.
///
/// Resolution is purely structural: it never allocates new values and
/// never inspects request bodies.
pub fn resolve<'a>(
    root: &'a mut dyn Addressable,
    path: &[String],
) -> Result<&'a mut dyn Addressable, NodeError> {
    let mut current = root;
    for segment in path {
        current = descend(current, segment)?;
    }
    Ok(current)
}

fn descend<'a>(
    value: &'a mut dyn Addressable,
    segment: &str,
) -> Result<&'a mut dyn Addressable, NodeError> {
    match value.node() {
        Node::Record(record) => {
            let table = fields(&*record);
            let declared = table.lookup(segment).ok_or_else(|| NodeError::FieldNotFound {
                field: segment.to_string(),
            })?;
            record.field_mut(declared).ok_or_else(|| NodeError::FieldNotFound {
                field: segment.to_string(),
            })
        }
        Node::Sequence(sequence) => {
            let index = checked_index(segment, sequence.len())?;
            Ok(sequence.elem_mut(index))
        }
        Node::Scalar => Err(NodeError::PathNotFound {
            segment: segment.to_string(),
            kind: "scalar",
        }),
    }
}

/// Parse a path segment as a sequence index and bounds-check it.
///
/// A non-integer segment is an [`NodeError::InvalidIndex`]; an integer
/// outside `[0, len)` (negative included) is an
/// [`NodeError::IndexOutOfRange`].
pub(super) fn checked_index(segment: &str, len: usize) -> Result<usize, NodeError> {
    let index: i64 = segment.parse().map_err(|_| NodeError::InvalidIndex {
        segment: segment.to_string(),
    })?;
    if index < 0 || index as usize >= len {
        return Err(NodeError::IndexOutOfRange { index, len });
    }
    Ok(index as usize)
}
