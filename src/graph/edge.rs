//! Edge implementation for the base graph

use super::attribute::{AttributeMap, AttributeValue};
use super::types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// An edge in the base graph
///
/// Edges have:
/// - A stable string identifier
/// - A source node (edge goes FROM this node when directed)
/// - A target node (edge goes TO this node when directed)
/// - A directed flag
/// - Attributes (key-value pairs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source node
    pub from: NodeId,

    /// Target node
    pub to: NodeId,

    /// Whether the edge is directed from source to target
    pub directed: bool,

    /// Attributes associated with this edge
    pub attributes: AttributeMap,
}

impl Edge {
    /// Create a new edge with no attributes
    pub fn new(
        id: impl Into<EdgeId>,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        directed: bool,
    ) -> Self {
        Edge {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            directed,
            attributes: AttributeMap::new(),
        }
    }

    /// Create a new edge with attributes
    pub fn with_attributes(
        id: impl Into<EdgeId>,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        directed: bool,
        attributes: AttributeMap,
    ) -> Self {
        Edge {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            directed,
            attributes,
        }
    }

    /// Set an attribute value, returning the previous value if any
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Get an attribute value
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Remove an attribute
    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.remove(key)
    }

    /// Check if attribute exists
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Get number of attributes
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Check if both endpoints are the same node
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }

    /// Check if this edge connects two specific nodes (in either direction)
    pub fn connects(&self, node1: &NodeId, node2: &NodeId) -> bool {
        (&self.from == node1 && &self.to == node2) || (&self.from == node2 && &self.to == node1)
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: &NodeId) -> bool {
        &self.from == node
    }

    /// Check if this edge goes TO a specific node
    pub fn ends_at(&self, node: &NodeId) -> bool {
        &self.to == node
    }

    /// Get the endpoint opposite to the given node, if the node is an endpoint
    pub fn opposite(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.from == node {
            Some(&self.to)
        } else if &self.to == node {
            Some(&self.from)
        } else {
            None
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
