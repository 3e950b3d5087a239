//! Scalar rendering: the canonical byte sequence served as file content.

use std::borrow::Cow;

use crate::error::FsError;
use crate::node::Node;

/// Render a scalar node to its canonical text, or `None` for containers.
///
/// The returned text is the exact content the read engine serves, and its
/// byte length is the exact size the attribute mapper reports. Rendering is
/// deterministic: two calls on the same node yield byte-identical output.
///
/// Strings borrow straight from the tree; only numbers allocate.
pub fn scalar(node: &Node) -> Option<Cow<'_, str>> {
    match node {
        Node::Object(_) | Node::Array(_) => None,
        Node::String(s) => Some(Cow::Borrowed(s.as_str())),
        Node::Bool(true) => Some(Cow::Borrowed("true")),
        Node::Bool(false) => Some(Cow::Borrowed("false")),
        Node::Null => Some(Cow::Borrowed("null")),
        Node::Integer(value) => Some(Cow::Owned(integer_text(*value))),
        Node::Real(value) => Some(Cow::Owned(real_text(*value))),
    }
}

/// Render a scalar node, failing with [`FsError::NotAFile`] for containers.
pub fn render(node: &Node) -> Result<Cow<'_, str>, FsError> {
    scalar(node).ok_or(FsError::NotAFile { kind: node.kind() })
}

/// Canonical decimal rendering of an integer: no leading zeros, no plus
/// sign, minus sign only when negative.
pub fn integer_text(value: i64) -> String {
    value.to_string()
}

/// Canonical rendering of a real.
///
/// The standard formatter emits the shortest decimal string that parses
/// back to the same double, but omits the fractional part for values that
/// are mathematically integral (`4.0` formats as `4`). A real must stay
/// textually distinguishable from an integer, so `.0` is appended when the
/// result carries no decimal point or exponent marker.
pub fn real_text(value: f64) -> String {
    let mut text = value.to_string();
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}
