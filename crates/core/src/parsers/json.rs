//! JSON structure extractor
//!
//! Converts an already-deserialized JSON value into the shared node tree by
//! recursive descent. Deserialization itself happens upstream; a failure
//! there is surfaced through [`JsonStructureExtractor::error_node`].

use crate::models::{Node, NodeKind};
use serde_json::Value;
use std::path::Path;

/// Recursive extractor for deserialized JSON values
#[derive(Default)]
pub struct JsonStructureExtractor;

impl JsonStructureExtractor {
    /// Create an extractor
    pub fn new() -> Self {
        Self
    }

    /// Mirror a JSON value as a node forest at the given nesting level
    ///
    /// Object properties and array elements keep their declaration order.
    pub fn extract(&self, value: &Value, path: &Path, level: usize) -> Vec<Node> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(key, val)| self.member_node(key, val, path, level))
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, element)| self.item_node(index, element, path, level))
                .collect(),
            scalar => vec![Node::new(scalar_text(scalar), path, NodeKind::Property, level)],
        }
    }

    /// Node for one object property
    fn member_node(&self, key: &str, value: &Value, path: &Path, level: usize) -> Node {
        if is_composite(value) {
            let mut node = Node::new(key, path, NodeKind::Object, level);
            node.lines.push(summary(value));
            node.children = self.extract(value, path, level + 1);
            node
        } else {
            Node::new(
                format!("{}: {}", key, scalar_text(value)),
                path,
                NodeKind::Property,
                level,
            )
        }
    }

    /// Node for one array element
    fn item_node(&self, index: usize, value: &Value, path: &Path, level: usize) -> Node {
        let mut node = Node::new(format!("[{}]", index), path, NodeKind::ArrayItem, level);
        if is_composite(value) {
            node.lines.push(summary(value));
            node.children = self.extract(value, path, level + 1);
        } else {
            node.lines.push(scalar_text(value));
        }
        node
    }

    /// The deserialization-failure path: one error node, message as its name
    pub fn error_node(message: &str, path: &Path) -> Node {
        Node::new(message, path, NodeKind::Error, 1)
    }
}

fn is_composite(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// One-line content summary for composite values
fn summary(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("Array with {} items", items.len()),
        Value::Object(map) => format!("Object with {} properties", map.len()),
        _ => String::new(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}
