//! Proxy handles returned by the view
//!
//! [`FilteredNode`] and [`FilteredEdge`] are ephemeral handles over the
//! view's membership state. Attribute operations forward to the base
//! element; structural queries answer from the view, so traversal from a
//! handle never leaves the view. A handle outliving its element's
//! membership reports `NodeNotFound`/`EdgeNotFound` on view-local queries.

use crate::error::{GraphError, GraphResult};
use crate::graph::attribute::AttributeValue;
use crate::graph::types::{EdgeId, NodeId};
use crate::graph::{EdgeEndpoints, GraphBase};

use super::graph::FilteredGraph;

/// Handle to a node included in a view.
#[derive(Clone)]
pub struct FilteredNode {
    view: FilteredGraph,
    id: NodeId,
}

impl FilteredNode {
    pub(crate) fn new(view: FilteredGraph, id: NodeId) -> Self {
        FilteredNode { view, id }
    }

    /// Identifier of the underlying base node.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Current view-local index.
    pub fn index(&self) -> GraphResult<usize> {
        self.view
            .core()
            .borrow()
            .membership
            .node_index_of(self.id.as_str())
            .ok_or_else(|| GraphError::NodeNotFound(self.id.clone()))
    }

    fn degrees(&self) -> GraphResult<(usize, usize, usize)> {
        {
            let core = self.view.core().borrow();
            if let Some(counters) = core.membership.degrees(self.id.as_str()) {
                return Ok(counters);
            }
            if !core.membership.contains_node(self.id.as_str()) {
                return Err(GraphError::NodeNotFound(self.id.clone()));
            }
        }
        // identifier mode keeps no counters; count included incident edges
        let mut entering = 0;
        let mut leaving = 0;
        let mut total = 0;
        for edge in self.view.incident_edges(self.id.as_str()) {
            let Some(endpoints) = self.view.endpoints_of(edge.as_str()) else {
                continue;
            };
            if endpoints.is_loop() || !endpoints.directed {
                entering += 1;
                leaving += 1;
            } else if endpoints.from == self.id {
                leaving += 1;
            } else {
                entering += 1;
            }
            total += 1;
        }
        Ok((entering, leaving, total))
    }

    /// Number of included incident edges.
    pub fn degree(&self) -> GraphResult<usize> {
        self.degrees().map(|(_, _, total)| total)
    }

    /// In-degree within the view. Undirected edges and loops count on
    /// both sides.
    pub fn in_degree(&self) -> GraphResult<usize> {
        self.degrees().map(|(entering, _, _)| entering)
    }

    /// Out-degree within the view.
    pub fn out_degree(&self) -> GraphResult<usize> {
        self.degrees().map(|(_, leaving, _)| leaving)
    }

    /// Get an attribute of the base node.
    pub fn attribute(&self, key: &str) -> Option<AttributeValue> {
        self.view.base().node_attribute(self.id.as_str(), key)
    }

    /// Set an attribute on the base node (write-through).
    pub fn set_attribute(
        &self,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> GraphResult<()> {
        self.view
            .base()
            .set_node_attribute(self.id.as_str(), key, value.into())
    }

    /// Remove an attribute from the base node (write-through).
    pub fn remove_attribute(&self, key: &str) -> GraphResult<()> {
        self.view.base().remove_node_attribute(self.id.as_str(), key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    pub fn attribute_keys(&self) -> Vec<String> {
        self.view.base().node_attribute_keys(self.id.as_str())
    }

    /// Included incident edges.
    pub fn edges(&self) -> Vec<FilteredEdge> {
        self.view
            .incident_edges(self.id.as_str())
            .into_iter()
            .map(|id| FilteredEdge::new(self.view.clone(), id))
            .collect()
    }

    /// Included incident edges entering this node.
    pub fn entering_edges(&self) -> Vec<FilteredEdge> {
        self.edges_where(|endpoints, id| {
            !endpoints.directed || endpoints.is_loop() || &endpoints.to == id
        })
    }

    /// Included incident edges leaving this node.
    pub fn leaving_edges(&self) -> Vec<FilteredEdge> {
        self.edges_where(|endpoints, id| {
            !endpoints.directed || endpoints.is_loop() || &endpoints.from == id
        })
    }

    fn edges_where(&self, keep: impl Fn(&EdgeEndpoints, &NodeId) -> bool) -> Vec<FilteredEdge> {
        self.view
            .incident_edges(self.id.as_str())
            .into_iter()
            .filter(|edge| {
                self.view
                    .endpoints_of(edge.as_str())
                    .is_some_and(|endpoints| keep(&endpoints, &self.id))
            })
            .map(|id| FilteredEdge::new(self.view.clone(), id))
            .collect()
    }

    /// Included neighbor nodes, one entry per connecting edge.
    pub fn neighbors(&self) -> Vec<FilteredNode> {
        self.view
            .incident_edges(self.id.as_str())
            .into_iter()
            .filter_map(|edge| {
                let endpoints = self.view.endpoints_of(edge.as_str())?;
                let other = endpoints.opposite(&self.id)?.clone();
                self.view.contains_node(other.as_str()).then(|| {
                    FilteredNode::new(self.view.clone(), other)
                })
            })
            .collect()
    }
}

impl PartialEq for FilteredNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FilteredNode {}

impl std::fmt::Debug for FilteredNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredNode").field("id", &self.id).finish()
    }
}

/// Handle to an edge included in a view.
///
/// Endpoint accessors resolve to [`FilteredNode`] handles of the same
/// view, never to base nodes.
#[derive(Clone)]
pub struct FilteredEdge {
    view: FilteredGraph,
    id: EdgeId,
}

impl FilteredEdge {
    pub(crate) fn new(view: FilteredGraph, id: EdgeId) -> Self {
        FilteredEdge { view, id }
    }

    /// Identifier of the underlying base edge.
    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    /// Current view-local index.
    pub fn index(&self) -> GraphResult<usize> {
        self.view
            .core()
            .borrow()
            .membership
            .edge_index_of(self.id.as_str())
            .ok_or_else(|| GraphError::EdgeNotFound(self.id.clone()))
    }

    fn endpoints(&self) -> GraphResult<EdgeEndpoints> {
        self.view
            .endpoints_of(self.id.as_str())
            .ok_or_else(|| GraphError::EdgeNotFound(self.id.clone()))
    }

    pub fn is_directed(&self) -> GraphResult<bool> {
        self.endpoints().map(|endpoints| endpoints.directed)
    }

    pub fn is_loop(&self) -> GraphResult<bool> {
        self.endpoints().map(|endpoints| endpoints.is_loop())
    }

    /// Source node, resolved within the view.
    pub fn source(&self) -> GraphResult<FilteredNode> {
        let endpoints = self.endpoints()?;
        self.resolve(endpoints.from)
    }

    /// Target node, resolved within the view.
    pub fn target(&self) -> GraphResult<FilteredNode> {
        let endpoints = self.endpoints()?;
        self.resolve(endpoints.to)
    }

    /// Endpoint opposite to `node`, resolved within the view.
    pub fn opposite(&self, node: &FilteredNode) -> GraphResult<FilteredNode> {
        let endpoints = self.endpoints()?;
        let other = endpoints
            .opposite(node.id())
            .ok_or_else(|| GraphError::NodeNotFound(node.id().clone()))?
            .clone();
        self.resolve(other)
    }

    fn resolve(&self, node: NodeId) -> GraphResult<FilteredNode> {
        if self.view.contains_node(node.as_str()) {
            Ok(FilteredNode::new(self.view.clone(), node))
        } else {
            Err(GraphError::UnresolvedEndpoint {
                edge: self.id.clone(),
                node,
            })
        }
    }

    /// Get an attribute of the base edge.
    pub fn attribute(&self, key: &str) -> Option<AttributeValue> {
        self.view.base().edge_attribute(self.id.as_str(), key)
    }

    /// Set an attribute on the base edge (write-through).
    pub fn set_attribute(
        &self,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> GraphResult<()> {
        self.view
            .base()
            .set_edge_attribute(self.id.as_str(), key, value.into())
    }

    /// Remove an attribute from the base edge (write-through).
    pub fn remove_attribute(&self, key: &str) -> GraphResult<()> {
        self.view.base().remove_edge_attribute(self.id.as_str(), key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    pub fn attribute_keys(&self) -> Vec<String> {
        self.view.base().edge_attribute_keys(self.id.as_str())
    }
}

impl PartialEq for FilteredEdge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FilteredEdge {}

impl std::fmt::Debug for FilteredEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredEdge").field("id", &self.id).finish()
    }
}
