//! Core identifier types for graph elements

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier of a node (e.g. "A", "paris", "router-3")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Stable identifier of an edge (e.g. "AB", "link-12")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        EdgeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EdgeId {
    fn from(id: String) -> Self {
        EdgeId(id)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        EdgeId(id.to_string())
    }
}

impl Borrow<str> for EdgeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Tag distinguishing the two concrete element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Node,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Node => write!(f, "node"),
            ElementKind::Edge => write!(f, "edge"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_node_id() {
        let id = NodeId::new("A");
        assert_eq!(id.as_str(), "A");
        assert_eq!(format!("{}", id), "A");

        let id2: NodeId = "B".into();
        assert_eq!(id2.as_str(), "B");
    }

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new("AB");
        assert_eq!(id.as_str(), "AB");
        assert_eq!(format!("{}", id), "AB");
    }

    #[test]
    fn test_str_lookup() {
        // maps keyed by id are searchable with plain &str
        let mut map = HashMap::new();
        map.insert(NodeId::new("A"), 1usize);
        assert_eq!(map.get("A"), Some(&1));
        assert_eq!(map.get("B"), None);
    }

    #[test]
    fn test_id_ordering() {
        let id1 = NodeId::new("A");
        let id2 = NodeId::new("B");
        assert!(id1 < id2);
    }

    #[test]
    fn test_element_kind_display() {
        assert_eq!(format!("{}", ElementKind::Node), "node");
        assert_eq!(format!("{}", ElementKind::Edge), "edge");
    }
}
