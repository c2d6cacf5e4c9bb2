//! The filtered graph surface

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{GraphError, GraphResult};
use crate::filter::Predicate;
use crate::graph::attribute::AttributeValue;
use crate::graph::types::{EdgeId, ElementKind, NodeId};
use crate::graph::{EdgeEndpoints, GraphBase};
use crate::stream::{dispatch, GraphEvent, SharedSink, Sink};

use super::element::{FilteredEdge, FilteredNode};
use super::engine::{Membership, ViewCore};
use super::relay::BaseRelay;

/// How the view represents its membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Re-evaluated continuously; members are wrapped in proxies with
    /// view-local indices and degree counters.
    Live,
    /// Members are tracked as identifier sets only. With
    /// `static_inclusion`, membership is frozen at construction and the
    /// view detaches from the base event stream entirely.
    Snapshot { static_inclusion: bool },
}

/// Construction-time configuration of a view.
///
/// `strict` selects how lookups and removals of absent elements report:
/// strict views fail, lenient views return an absent result.
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub mode: ViewMode,
    pub strict: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            mode: ViewMode::Live,
            strict: true,
        }
    }
}

/// A live, predicate-filtered view of a base graph.
///
/// The view's population always matches the elements of the base graph
/// that satisfy its predicates, kept up to date from the base mutation
/// stream. The view is itself a [`GraphBase`]: it can be queried like a
/// graph, mutated (writes are forwarded to the base graph and come back
/// through the event stream), observed by downstream sinks, and used as
/// the base of another view.
///
/// `FilteredGraph` is a cheap handle: clones share state. When the last
/// handle is dropped the view detaches from its base automatically.
#[derive(Clone)]
pub struct FilteredGraph {
    core: Rc<RefCell<ViewCore>>,
    base: Rc<dyn GraphBase>,
    _relay: Option<Rc<RefCell<BaseRelay>>>,
}

impl FilteredGraph {
    /// Create a live view over `base` with default options.
    pub fn new(
        id: impl Into<String>,
        base: &(impl GraphBase + Clone + 'static),
        node_filter: Predicate,
        edge_filter: Predicate,
    ) -> GraphResult<Self> {
        Self::with_options(id, base, node_filter, edge_filter, ViewOptions::default())
    }

    /// Create a view over `base` with explicit options.
    pub fn with_options(
        id: impl Into<String>,
        base: &(impl GraphBase + Clone + 'static),
        node_filter: Predicate,
        edge_filter: Predicate,
        options: ViewOptions,
    ) -> GraphResult<Self> {
        let id = id.into();
        let base: Rc<dyn GraphBase> = Rc::new(base.clone());

        let membership = match options.mode {
            ViewMode::Live => Membership::proxies(),
            ViewMode::Snapshot { .. } => Membership::identifiers(),
        };
        let core = Rc::new(RefCell::new(ViewCore::new(
            id.clone(),
            node_filter,
            edge_filter,
            options.strict,
            membership,
        )));
        core.borrow_mut().populate(base.as_ref())?;

        let relay = match options.mode {
            ViewMode::Snapshot {
                static_inclusion: true,
            } => {
                debug!(view = %id, "static inclusion, not attaching to base");
                None
            }
            _ => {
                let relay = Rc::new(RefCell::new(BaseRelay {
                    core: Rc::downgrade(&core),
                    base: base.clone(),
                }));
                let sink: SharedSink = relay.clone();
                base.add_sink(sink);
                debug!(view = %id, base = %base.id(), "view attached to base");
                Some(relay)
            }
        };

        Ok(FilteredGraph {
            core,
            base,
            _relay: relay,
        })
    }

    pub(crate) fn core(&self) -> &Rc<RefCell<ViewCore>> {
        &self.core
    }

    pub(crate) fn base(&self) -> &Rc<dyn GraphBase> {
        &self.base
    }

    /// Endpoints of an included edge, from the proxy cache when tracked.
    pub(crate) fn endpoints_of(&self, edge: &str) -> Option<EdgeEndpoints> {
        let cached = self.core.borrow().membership.cached_endpoints(edge);
        if cached.is_some() {
            return cached;
        }
        if self.core.borrow().membership.contains_edge(edge) {
            self.base.edge_endpoints(edge)
        } else {
            None
        }
    }

    fn member_node(&self, id: &str) -> Option<FilteredNode> {
        if self.core.borrow().membership.contains_node(id) {
            Some(FilteredNode::new(self.clone(), NodeId::new(id)))
        } else {
            None
        }
    }

    fn member_edge(&self, id: &str) -> Option<FilteredEdge> {
        if self.core.borrow().membership.contains_edge(id) {
            Some(FilteredEdge::new(self.clone(), EdgeId::new(id)))
        } else {
            None
        }
    }

    fn is_strict(&self) -> bool {
        self.core.borrow().strict
    }

    /// Look a node up by identifier.
    ///
    /// A strict view fails on absent identifiers; a lenient view returns
    /// `Ok(None)`.
    pub fn get_node(&self, id: &str) -> GraphResult<Option<FilteredNode>> {
        match self.member_node(id) {
            Some(node) => Ok(Some(node)),
            None if self.is_strict() => Err(GraphError::NodeNotFound(NodeId::new(id))),
            None => Ok(None),
        }
    }

    /// Look an edge up by identifier; strictness as for [`get_node`](Self::get_node).
    pub fn get_edge(&self, id: &str) -> GraphResult<Option<FilteredEdge>> {
        match self.member_edge(id) {
            Some(edge) => Ok(Some(edge)),
            None if self.is_strict() => Err(GraphError::EdgeNotFound(EdgeId::new(id))),
            None => Ok(None),
        }
    }

    /// Node at a view-local index in `0..node_count()`.
    pub fn node_at(&self, index: usize) -> GraphResult<FilteredNode> {
        let id = {
            let core = self.core.borrow();
            core.membership
                .node_id_at(index)
                .ok_or(GraphError::IndexOutOfRange {
                    kind: ElementKind::Node,
                    index,
                    len: core.membership.node_count(),
                })?
        };
        Ok(FilteredNode::new(self.clone(), id))
    }

    /// Edge at a view-local index in `0..edge_count()`.
    pub fn edge_at(&self, index: usize) -> GraphResult<FilteredEdge> {
        let id = {
            let core = self.core.borrow();
            core.membership
                .edge_id_at(index)
                .ok_or(GraphError::IndexOutOfRange {
                    kind: ElementKind::Edge,
                    index,
                    len: core.membership.edge_count(),
                })?
        };
        Ok(FilteredEdge::new(self.clone(), id))
    }

    /// Included nodes, in index order.
    pub fn nodes(&self) -> Vec<FilteredNode> {
        let ids = self.core.borrow().membership.node_ids();
        ids.into_iter()
            .map(|id| FilteredNode::new(self.clone(), id))
            .collect()
    }

    /// Included edges, in index order.
    pub fn edges(&self) -> Vec<FilteredEdge> {
        let ids = self.core.borrow().membership.edge_ids();
        ids.into_iter()
            .map(|id| FilteredEdge::new(self.clone(), id))
            .collect()
    }

    /// Add a node to the base graph through the view.
    ///
    /// Returns the proxy registered for the identifier after the base
    /// event has driven membership, or `None` if the predicates keep the
    /// new node out of the view.
    pub fn add_node(&self, id: &str) -> GraphResult<Option<FilteredNode>> {
        self.base.add_node(id)?;
        Ok(self.member_node(id))
    }

    /// Add an edge to the base graph through the view; returns the proxy
    /// as for [`add_node`](Self::add_node).
    pub fn add_edge(
        &self,
        id: &str,
        from: &str,
        to: &str,
        directed: bool,
    ) -> GraphResult<Option<FilteredEdge>> {
        self.base.add_edge(id, from, to, directed)?;
        Ok(self.member_edge(id))
    }

    /// Add an edge between two proxies obtained from this view.
    pub fn add_edge_between(
        &self,
        id: &str,
        from: &FilteredNode,
        to: &FilteredNode,
        directed: bool,
    ) -> GraphResult<Option<FilteredEdge>> {
        self.add_edge(id, from.id().as_str(), to.id().as_str(), directed)
    }

    /// Remove a node visible in this view from the base graph.
    ///
    /// A strict view fails when the node is not a member; a lenient view
    /// leaves the base untouched.
    pub fn remove_node(&self, id: &str) -> GraphResult<()> {
        if self.member_node(id).is_none() {
            if self.is_strict() {
                return Err(GraphError::NodeNotFound(NodeId::new(id)));
            }
            return Ok(());
        }
        self.base.remove_node(id)
    }

    /// Remove an edge visible in this view from the base graph;
    /// strictness as for [`remove_node`](Self::remove_node).
    pub fn remove_edge(&self, id: &str) -> GraphResult<()> {
        if self.member_edge(id).is_none() {
            if self.is_strict() {
                return Err(GraphError::EdgeNotFound(EdgeId::new(id)));
            }
            return Ok(());
        }
        self.base.remove_edge(id)
    }

    /// Detach from the base event stream. Membership stops updating;
    /// queries keep answering from the last synchronized state.
    pub fn detach(&self) {
        if let Some(relay) = &self._relay {
            let sink: SharedSink = relay.clone();
            self.base.remove_sink(&sink);
            debug!(view = %self.core.borrow().id, "view detached from base");
        }
    }

    fn emit_own(&self, event: GraphEvent) -> GraphResult<()> {
        let sinks = self.core.borrow_mut().sinks.snapshot();
        if sinks.is_empty() {
            return Ok(());
        }
        dispatch(&sinks, &event)
    }
}

impl GraphBase for FilteredGraph {
    fn id(&self) -> String {
        self.core.borrow().id.clone()
    }

    fn contains_node(&self, id: &str) -> bool {
        self.core.borrow().membership.contains_node(id)
    }

    fn contains_edge(&self, id: &str) -> bool {
        self.core.borrow().membership.contains_edge(id)
    }

    fn node_count(&self) -> usize {
        self.core.borrow().membership.node_count()
    }

    fn edge_count(&self) -> usize {
        self.core.borrow().membership.edge_count()
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.core.borrow().membership.node_ids()
    }

    fn edge_ids(&self) -> Vec<EdgeId> {
        self.core.borrow().membership.edge_ids()
    }

    fn node_id_at(&self, index: usize) -> GraphResult<NodeId> {
        let core = self.core.borrow();
        core.membership
            .node_id_at(index)
            .ok_or(GraphError::IndexOutOfRange {
                kind: ElementKind::Node,
                index,
                len: core.membership.node_count(),
            })
    }

    fn edge_id_at(&self, index: usize) -> GraphResult<EdgeId> {
        let core = self.core.borrow();
        core.membership
            .edge_id_at(index)
            .ok_or(GraphError::IndexOutOfRange {
                kind: ElementKind::Edge,
                index,
                len: core.membership.edge_count(),
            })
    }

    fn edge_endpoints(&self, id: &str) -> Option<EdgeEndpoints> {
        self.endpoints_of(id)
    }

    fn incident_edges(&self, node: &str) -> Vec<EdgeId> {
        if !self.contains_node(node) {
            return Vec::new();
        }
        let core = self.core.borrow();
        core.membership.edges_touching(node, self.base.as_ref())
    }

    fn node_attribute(&self, id: &str, key: &str) -> Option<AttributeValue> {
        if self.contains_node(id) {
            self.base.node_attribute(id, key)
        } else {
            None
        }
    }

    fn edge_attribute(&self, id: &str, key: &str) -> Option<AttributeValue> {
        if self.contains_edge(id) {
            self.base.edge_attribute(id, key)
        } else {
            None
        }
    }

    fn node_attribute_keys(&self, id: &str) -> Vec<String> {
        if self.contains_node(id) {
            self.base.node_attribute_keys(id)
        } else {
            Vec::new()
        }
    }

    fn edge_attribute_keys(&self, id: &str) -> Vec<String> {
        if self.contains_edge(id) {
            self.base.edge_attribute_keys(id)
        } else {
            Vec::new()
        }
    }

    fn graph_attribute(&self, key: &str) -> Option<AttributeValue> {
        self.core.borrow().attributes.get(key).cloned()
    }

    fn add_node(&self, id: &str) -> GraphResult<()> {
        FilteredGraph::add_node(self, id).map(|_| ())
    }

    fn add_edge(&self, id: &str, from: &str, to: &str, directed: bool) -> GraphResult<()> {
        FilteredGraph::add_edge(self, id, from, to, directed).map(|_| ())
    }

    fn remove_node(&self, id: &str) -> GraphResult<()> {
        FilteredGraph::remove_node(self, id)
    }

    fn remove_edge(&self, id: &str) -> GraphResult<()> {
        FilteredGraph::remove_edge(self, id)
    }

    fn set_node_attribute(&self, id: &str, key: &str, value: AttributeValue) -> GraphResult<()> {
        if !self.contains_node(id) {
            return Err(GraphError::NodeNotFound(NodeId::new(id)));
        }
        self.base.set_node_attribute(id, key, value)
    }

    fn remove_node_attribute(&self, id: &str, key: &str) -> GraphResult<()> {
        if !self.contains_node(id) {
            return Err(GraphError::NodeNotFound(NodeId::new(id)));
        }
        self.base.remove_node_attribute(id, key)
    }

    fn set_edge_attribute(&self, id: &str, key: &str, value: AttributeValue) -> GraphResult<()> {
        if !self.contains_edge(id) {
            return Err(GraphError::EdgeNotFound(EdgeId::new(id)));
        }
        self.base.set_edge_attribute(id, key, value)
    }

    fn remove_edge_attribute(&self, id: &str, key: &str) -> GraphResult<()> {
        if !self.contains_edge(id) {
            return Err(GraphError::EdgeNotFound(EdgeId::new(id)));
        }
        self.base.remove_edge_attribute(id, key)
    }

    /// Graph-level attributes belong to the view itself, not the base.
    fn set_graph_attribute(&self, key: &str, value: AttributeValue) -> GraphResult<()> {
        let event = {
            let mut core = self.core.borrow_mut();
            let old = core.attributes.insert(key.to_string(), value.clone());
            let time = core.new_event_time();
            let source = core.id.clone();
            match old {
                Some(old) => GraphEvent::GraphAttributeChanged {
                    source,
                    time,
                    key: key.to_string(),
                    old,
                    new: value,
                },
                None => GraphEvent::GraphAttributeAdded {
                    source,
                    time,
                    key: key.to_string(),
                    value,
                },
            }
        };
        self.emit_own(event)
    }

    fn remove_graph_attribute(&self, key: &str) -> GraphResult<()> {
        let event = {
            let mut core = self.core.borrow_mut();
            if core.attributes.remove(key).is_none() {
                return Ok(());
            }
            let time = core.new_event_time();
            GraphEvent::GraphAttributeRemoved {
                source: core.id.clone(),
                time,
                key: key.to_string(),
            }
        };
        self.emit_own(event)
    }

    fn step_begins(&self, step: f64) -> GraphResult<()> {
        self.base.step_begins(step)
    }

    fn clear(&self) -> GraphResult<()> {
        Err(GraphError::Unsupported("clear"))
    }

    fn add_sink(&self, sink: SharedSink) {
        self.core.borrow_mut().sinks.add(&sink);
    }

    fn remove_sink(&self, sink: &SharedSink) {
        self.core.borrow_mut().sinks.remove(sink);
    }
}

/// Event-form input: the view forwards incoming events to its base graph
/// as write-through mutations, guarded by the "already seen" table so that
/// chained pipes terminate instead of cycling. Events about elements the
/// view cannot see are dropped.
impl Sink for FilteredGraph {
    fn handle(&mut self, event: &GraphEvent) -> GraphResult<()> {
        let fresh = self
            .core
            .borrow_mut()
            .guard
            .is_new_event(event.source(), event.time());
        if !fresh {
            trace!(source = event.source(), time = event.time(), view = %self.id(), "event already seen, skipping");
            return Ok(());
        }
        match event {
            GraphEvent::NodeAdded { node, .. } => {
                if self.base.contains_node(node.as_str()) {
                    Ok(())
                } else {
                    self.base.add_node(node.as_str())
                }
            }
            GraphEvent::NodeRemoved { node, .. } => {
                if self.contains_node(node.as_str()) {
                    self.base.remove_node(node.as_str())
                } else {
                    Ok(())
                }
            }
            GraphEvent::EdgeAdded {
                edge,
                from,
                to,
                directed,
                ..
            } => {
                if self.base.contains_edge(edge.as_str()) {
                    Ok(())
                } else {
                    self.base
                        .add_edge(edge.as_str(), from.as_str(), to.as_str(), *directed)
                }
            }
            GraphEvent::EdgeRemoved { edge, .. } => {
                if self.contains_edge(edge.as_str()) {
                    self.base.remove_edge(edge.as_str())
                } else {
                    Ok(())
                }
            }
            GraphEvent::NodeAttributeAdded { node, key, value, .. } => {
                if self.contains_node(node.as_str()) {
                    self.base
                        .set_node_attribute(node.as_str(), key, value.clone())
                } else {
                    Ok(())
                }
            }
            GraphEvent::NodeAttributeChanged { node, key, new, .. } => {
                if self.contains_node(node.as_str()) {
                    self.base.set_node_attribute(node.as_str(), key, new.clone())
                } else {
                    Ok(())
                }
            }
            GraphEvent::NodeAttributeRemoved { node, key, .. } => {
                if self.contains_node(node.as_str()) {
                    self.base.remove_node_attribute(node.as_str(), key)
                } else {
                    Ok(())
                }
            }
            GraphEvent::EdgeAttributeAdded { edge, key, value, .. } => {
                if self.contains_edge(edge.as_str()) {
                    self.base
                        .set_edge_attribute(edge.as_str(), key, value.clone())
                } else {
                    Ok(())
                }
            }
            GraphEvent::EdgeAttributeChanged { edge, key, new, .. } => {
                if self.contains_edge(edge.as_str()) {
                    self.base.set_edge_attribute(edge.as_str(), key, new.clone())
                } else {
                    Ok(())
                }
            }
            GraphEvent::EdgeAttributeRemoved { edge, key, .. } => {
                if self.contains_edge(edge.as_str()) {
                    self.base.remove_edge_attribute(edge.as_str(), key)
                } else {
                    Ok(())
                }
            }
            GraphEvent::GraphAttributeAdded { key, value, .. } => {
                self.set_graph_attribute(key, value.clone())
            }
            GraphEvent::GraphAttributeChanged { key, new, .. } => {
                self.set_graph_attribute(key, new.clone())
            }
            GraphEvent::GraphAttributeRemoved { key, .. } => self.remove_graph_attribute(key),
            GraphEvent::GraphCleared { .. } => {
                // clearing through a view is not supported; drop the event
                Ok(())
            }
            GraphEvent::StepBegins { step, .. } => self.base.step_begins(*step),
        }
    }
}
