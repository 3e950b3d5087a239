//! The document node - a tree-shaped JSON value.
//!
//! This is the tree jsonfs projects onto the filesystem namespace. Objects
//! and arrays become directories, everything else becomes a regular file.

use std::collections::BTreeMap;
use std::fmt;

/// One value in the parsed document tree.
///
/// # Design Notes
///
/// - Uses `BTreeMap` for a deterministic stored iteration order (directory
///   listings come straight out of it, no sorting pass)
/// - Splits numbers into `Integer`/`Real` because the two render differently
///   as file content (`7` vs `7.0`)
/// - Once a tree is built it is never mutated; every operation borrows it
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// JSON `null`.
    Null,
    /// JSON `true` / `false`.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Real(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of child nodes.
    Array(Vec<Node>),
    /// Key-value map with string keys.
    Object(BTreeMap<String, Node>),
}

/// The kind tag of a [`Node`], used in diagnostics and error payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Integer,
    Real,
    String,
    Array,
    Object,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "boolean",
            NodeKind::Integer => "integer",
            NodeKind::Real => "real",
            NodeKind::String => "string",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        };
        write!(f, "{}", name)
    }
}

impl Node {
    /// The kind tag for this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Integer(_) => NodeKind::Integer,
            Node::Real(_) => NodeKind::Real,
            Node::String(_) => NodeKind::String,
            Node::Array(_) => NodeKind::Array,
            Node::Object(_) => NodeKind::Object,
        }
    }

    /// Whether this node is presented as a directory (object or array).
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Array(_) | Node::Object(_))
    }
}

impl From<serde_json::Value> for Node {
    /// Convert a parsed `serde_json` value into a document node.
    ///
    /// Numbers become `Integer` when representable as `i64`, otherwise
    /// `Real`. Unsigned values above `i64::MAX` fall into the `Real` arm.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Node::Null,
            serde_json::Value::Bool(b) => Node::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Integer(i)
                } else {
                    // as_f64 is always Some for a serde_json number
                    Node::Real(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Node::String(s),
            serde_json::Value::Array(items) => {
                Node::Array(items.into_iter().map(Node::from).collect())
            }
            serde_json::Value::Object(map) => Node::Object(
                map.into_iter()
                    .map(|(key, child)| (key, Node::from(child)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_names() {
        assert_eq!(Node::Null.kind().to_string(), "null");
        assert_eq!(Node::Bool(true).kind().to_string(), "boolean");
        assert_eq!(Node::Integer(1).kind().to_string(), "integer");
        assert_eq!(Node::Real(1.5).kind().to_string(), "real");
        assert_eq!(Node::String("x".to_string()).kind().to_string(), "string");
        assert_eq!(Node::Array(vec![]).kind().to_string(), "array");
        assert_eq!(Node::Object(Default::default()).kind().to_string(), "object");
    }

    #[test]
    fn containers_are_containers() {
        assert!(Node::Array(vec![]).is_container());
        assert!(Node::Object(Default::default()).is_container());
        assert!(!Node::Null.is_container());
        assert!(!Node::String("x".to_string()).is_container());
    }

    #[test]
    fn integral_json_number_becomes_integer() {
        let node = Node::from(json!(42));
        assert_eq!(node, Node::Integer(42));
    }

    #[test]
    fn negative_json_number_becomes_integer() {
        let node = Node::from(json!(-7));
        assert_eq!(node, Node::Integer(-7));
    }

    #[test]
    fn fractional_json_number_becomes_real() {
        let node = Node::from(json!(4.5));
        assert_eq!(node, Node::Real(4.5));
    }

    #[test]
    fn u64_above_i64_range_becomes_real() {
        let node = Node::from(json!(u64::MAX));
        assert_eq!(node.kind(), NodeKind::Real);
    }

    #[test]
    fn nested_structure_converts() {
        let node = Node::from(json!({
            "name": "Alice",
            "scores": [90, 85.5],
            "active": true,
            "note": null,
        }));

        let Node::Object(map) = node else {
            panic!("expected object at root");
        };
        assert_eq!(map.get("name"), Some(&Node::String("Alice".to_string())));
        assert_eq!(
            map.get("scores"),
            Some(&Node::Array(vec![Node::Integer(90), Node::Real(85.5)]))
        );
        assert_eq!(map.get("active"), Some(&Node::Bool(true)));
        assert_eq!(map.get("note"), Some(&Node::Null));
    }
}
