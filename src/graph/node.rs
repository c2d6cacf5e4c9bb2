//! Node implementation for the base graph

use super::attribute::{AttributeMap, AttributeValue};
use super::types::NodeId;
use serde::{Deserialize, Serialize};

/// A node in the base graph
///
/// Nodes have:
/// - A stable string identifier
/// - Attributes (key-value pairs)
///
/// Adjacency is owned by the containing [`GraphStore`](super::GraphStore),
/// not by the node itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Attributes associated with this node
    pub attributes: AttributeMap,
}

impl Node {
    /// Create a new node with no attributes
    pub fn new(id: impl Into<NodeId>) -> Self {
        Node {
            id: id.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Create a new node with attributes
    pub fn with_attributes(id: impl Into<NodeId>, attributes: AttributeMap) -> Self {
        Node {
            id: id.into(),
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

    /// Iterate over attribute keys
    pub fn attribute_keys(&self) -> impl Iterator<Item = &String> {
        self.attributes.keys()
    }

    /// Get number of attributes
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
