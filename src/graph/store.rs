//! In-memory base graph with synchronous mutation events

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::attribute::{AttributeMap, AttributeValue};
use super::edge::Edge;
use super::node::Node;
use super::types::{EdgeId, ElementKind, NodeId};
use super::{EdgeEndpoints, GraphBase};
use crate::error::{GraphError, GraphResult};
use crate::stream::{dispatch, GraphEvent, SharedSink, Sink, SinkList, SinkTime, SourceTime};

struct StoreState {
    id: String,
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    /// Edges leaving each node (holds undirected edges by storage position)
    outgoing: FxHashMap<NodeId, Vec<EdgeId>>,
    /// Edges entering each node
    incoming: FxHashMap<NodeId, Vec<EdgeId>>,
    attributes: AttributeMap,
    sinks: SinkList,
    time: SourceTime,
    guard: SinkTime,
}

fn next_stamp(state: &mut StoreState, origin: Option<(&str, u64)>) -> (String, u64) {
    match origin {
        Some((source, time)) => (source.to_string(), time),
        None => {
            let StoreState {
                id, time, guard, ..
            } = state;
            let t = time.new_event(guard);
            (id.clone(), t)
        }
    }
}

fn incident_of(state: &StoreState, node: &str) -> Vec<EdgeId> {
    let mut result = Vec::new();
    if let Some(edges) = state.outgoing.get(node) {
        for edge in edges {
            if !result.contains(edge) {
                result.push(edge.clone());
            }
        }
    }
    if let Some(edges) = state.incoming.get(node) {
        for edge in edges {
            if !result.contains(edge) {
                result.push(edge.clone());
            }
        }
    }
    result
}

/// Canonical, mutable property graph.
///
/// `GraphStore` is a cheap handle: clones share the same state, so the store
/// can be held by several views at once. All mutation methods emit the
/// corresponding [`GraphEvent`] to registered sinks before returning, with
/// no internal borrow held, so sinks may re-enter the store.
///
/// Removal ordering contract: removing a node first removes each incident
/// edge (one `EdgeRemoved` per edge), then emits `NodeRemoved`. Removal
/// events are emitted while the element is still readable.
#[derive(Clone)]
pub struct GraphStore {
    state: Rc<RefCell<StoreState>>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        GraphStore {
            state: Rc::new(RefCell::new(StoreState {
                time: SourceTime::new(id.clone()),
                id,
                nodes: IndexMap::new(),
                edges: IndexMap::new(),
                outgoing: FxHashMap::default(),
                incoming: FxHashMap::default(),
                attributes: AttributeMap::new(),
                sinks: SinkList::new(),
                guard: SinkTime::new(),
            })),
        }
    }

    /// Get a copy of a node by identifier
    pub fn get_node(&self, id: &str) -> Option<Node> {
        self.state.borrow().nodes.get(id).cloned()
    }

    /// Get a copy of an edge by identifier
    pub fn get_edge(&self, id: &str) -> Option<Edge> {
        self.state.borrow().edges.get(id).cloned()
    }

    /// Number of distinct edges incident to a node
    pub fn degree(&self, node: &str) -> usize {
        incident_of(&self.state.borrow(), node).len()
    }

    fn emit(&self, event: GraphEvent) -> GraphResult<()> {
        let sinks = self.state.borrow_mut().sinks.snapshot();
        if sinks.is_empty() {
            return Ok(());
        }
        dispatch(&sinks, &event)
    }

    fn add_node_from(&self, id: &str, origin: Option<(&str, u64)>) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            if state.nodes.contains_key(id) {
                return Err(GraphError::NodeAlreadyExists(NodeId::new(id)));
            }
            let node_id = NodeId::new(id);
            state.nodes.insert(node_id.clone(), Node::new(node_id.clone()));
            state.outgoing.insert(node_id.clone(), Vec::new());
            state.incoming.insert(node_id.clone(), Vec::new());
            let (source, time) = next_stamp(&mut state, origin);
            GraphEvent::NodeAdded {
                source,
                time,
                node: node_id,
            }
        };
        debug!(node = id, graph = %self.id(), "node added");
        self.emit(event)
    }

    fn add_edge_from(
        &self,
        id: &str,
        from: &str,
        to: &str,
        directed: bool,
        origin: Option<(&str, u64)>,
    ) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            if state.edges.contains_key(id) {
                return Err(GraphError::EdgeAlreadyExists(EdgeId::new(id)));
            }
            if !state.nodes.contains_key(from) {
                return Err(GraphError::InvalidEdgeSource {
                    edge: EdgeId::new(id),
                    node: NodeId::new(from),
                });
            }
            if !state.nodes.contains_key(to) {
                return Err(GraphError::InvalidEdgeTarget {
                    edge: EdgeId::new(id),
                    node: NodeId::new(to),
                });
            }
            let edge = Edge::new(id, from, to, directed);
            state
                .outgoing
                .entry(edge.from.clone())
                .or_default()
                .push(edge.id.clone());
            state
                .incoming
                .entry(edge.to.clone())
                .or_default()
                .push(edge.id.clone());
            let (edge_id, from_id, to_id) = (edge.id.clone(), edge.from.clone(), edge.to.clone());
            state.edges.insert(edge_id.clone(), edge);
            let (source, time) = next_stamp(&mut state, origin);
            GraphEvent::EdgeAdded {
                source,
                time,
                edge: edge_id,
                from: from_id,
                to: to_id,
                directed,
            }
        };
        debug!(edge = id, from, to, directed, graph = %self.id(), "edge added");
        self.emit(event)
    }

    fn remove_edge_from(&self, id: &str, origin: Option<(&str, u64)>) -> GraphResult<()> {
        // the removal event is emitted while the edge is still readable
        let event = {
            let mut state = self.state.borrow_mut();
            if !state.edges.contains_key(id) {
                return Err(GraphError::EdgeNotFound(EdgeId::new(id)));
            }
            let (source, time) = next_stamp(&mut state, origin);
            GraphEvent::EdgeRemoved {
                source,
                time,
                edge: EdgeId::new(id),
            }
        };
        self.emit(event)?;

        let mut state = self.state.borrow_mut();
        if let Some(edge) = state.edges.swap_remove(id) {
            if let Some(adjacent) = state.outgoing.get_mut(&edge.from) {
                adjacent.retain(|e| e != &edge.id);
            }
            if let Some(adjacent) = state.incoming.get_mut(&edge.to) {
                adjacent.retain(|e| e != &edge.id);
            }
            debug!(edge = id, graph = %state.id, "edge removed");
        }
        Ok(())
    }

    fn remove_node_from(&self, id: &str, origin: Option<(&str, u64)>) -> GraphResult<()> {
        let incident = {
            let state = self.state.borrow();
            if !state.nodes.contains_key(id) {
                return Err(GraphError::NodeNotFound(NodeId::new(id)));
            }
            incident_of(&state, id)
        };

        // incident edges go first, each with its own removal event
        for edge in &incident {
            if self.contains_edge(edge.as_str()) {
                self.remove_edge_from(edge.as_str(), None)?;
            }
        }

        let event = {
            let mut state = self.state.borrow_mut();
            if !state.nodes.contains_key(id) {
                // a sink removed the node while handling the edge cascade
                return Ok(());
            }
            let (source, time) = next_stamp(&mut state, origin);
            GraphEvent::NodeRemoved {
                source,
                time,
                node: NodeId::new(id),
            }
        };
        self.emit(event)?;

        let mut state = self.state.borrow_mut();
        state.nodes.swap_remove(id);
        state.outgoing.remove(id);
        state.incoming.remove(id);
        debug!(node = id, graph = %state.id, "node removed");
        Ok(())
    }

    fn set_node_attribute_from(
        &self,
        id: &str,
        key: &str,
        value: AttributeValue,
        origin: Option<(&str, u64)>,
    ) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            let old = {
                let node = state
                    .nodes
                    .get_mut(id)
                    .ok_or_else(|| GraphError::NodeNotFound(NodeId::new(id)))?;
                node.set_attribute(key, value.clone())
            };
            let (source, time) = next_stamp(&mut state, origin);
            match old {
                Some(old) => GraphEvent::NodeAttributeChanged {
                    source,
                    time,
                    node: NodeId::new(id),
                    key: key.to_string(),
                    old,
                    new: value,
                },
                None => GraphEvent::NodeAttributeAdded {
                    source,
                    time,
                    node: NodeId::new(id),
                    key: key.to_string(),
                    value,
                },
            }
        };
        self.emit(event)
    }

    fn remove_node_attribute_from(
        &self,
        id: &str,
        key: &str,
        origin: Option<(&str, u64)>,
    ) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            let removed = {
                let node = state
                    .nodes
                    .get_mut(id)
                    .ok_or_else(|| GraphError::NodeNotFound(NodeId::new(id)))?;
                node.remove_attribute(key)
            };
            if removed.is_none() {
                return Ok(());
            }
            let (source, time) = next_stamp(&mut state, origin);
            GraphEvent::NodeAttributeRemoved {
                source,
                time,
                node: NodeId::new(id),
                key: key.to_string(),
            }
        };
        self.emit(event)
    }

    fn set_edge_attribute_from(
        &self,
        id: &str,
        key: &str,
        value: AttributeValue,
        origin: Option<(&str, u64)>,
    ) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            let old = {
                let edge = state
                    .edges
                    .get_mut(id)
                    .ok_or_else(|| GraphError::EdgeNotFound(EdgeId::new(id)))?;
                edge.set_attribute(key, value.clone())
            };
            let (source, time) = next_stamp(&mut state, origin);
            match old {
                Some(old) => GraphEvent::EdgeAttributeChanged {
                    source,
                    time,
                    edge: EdgeId::new(id),
                    key: key.to_string(),
                    old,
                    new: value,
                },
                None => GraphEvent::EdgeAttributeAdded {
                    source,
                    time,
                    edge: EdgeId::new(id),
                    key: key.to_string(),
                    value,
                },
            }
        };
        self.emit(event)
    }

    fn remove_edge_attribute_from(
        &self,
        id: &str,
        key: &str,
        origin: Option<(&str, u64)>,
    ) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            let removed = {
                let edge = state
                    .edges
                    .get_mut(id)
                    .ok_or_else(|| GraphError::EdgeNotFound(EdgeId::new(id)))?;
                edge.remove_attribute(key)
            };
            if removed.is_none() {
                return Ok(());
            }
            let (source, time) = next_stamp(&mut state, origin);
            GraphEvent::EdgeAttributeRemoved {
                source,
                time,
                edge: EdgeId::new(id),
                key: key.to_string(),
            }
        };
        self.emit(event)
    }

    fn set_graph_attribute_from(
        &self,
        key: &str,
        value: AttributeValue,
        origin: Option<(&str, u64)>,
    ) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            let old = state.attributes.insert(key.to_string(), value.clone());
            let (source, time) = next_stamp(&mut state, origin);
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
        self.emit(event)
    }

    fn remove_graph_attribute_from(
        &self,
        key: &str,
        origin: Option<(&str, u64)>,
    ) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            if state.attributes.remove(key).is_none() {
                return Ok(());
            }
            let (source, time) = next_stamp(&mut state, origin);
            GraphEvent::GraphAttributeRemoved {
                source,
                time,
                key: key.to_string(),
            }
        };
        self.emit(event)
    }

    fn step_begins_from(&self, step: f64, origin: Option<(&str, u64)>) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            let (source, time) = next_stamp(&mut state, origin);
            GraphEvent::StepBegins { source, time, step }
        };
        self.emit(event)
    }

    fn clear_from(&self, origin: Option<(&str, u64)>) -> GraphResult<()> {
        let event = {
            let mut state = self.state.borrow_mut();
            state.nodes.clear();
            state.edges.clear();
            state.outgoing.clear();
            state.incoming.clear();
            state.attributes.clear();
            let (source, time) = next_stamp(&mut state, origin);
            GraphEvent::GraphCleared { source, time }
        };
        debug!(graph = %self.id(), "graph cleared");
        self.emit(event)
    }
}

impl GraphBase for GraphStore {
    fn id(&self) -> String {
        self.state.borrow().id.clone()
    }

    fn contains_node(&self, id: &str) -> bool {
        self.state.borrow().nodes.contains_key(id)
    }

    fn contains_edge(&self, id: &str) -> bool {
        self.state.borrow().edges.contains_key(id)
    }

    fn node_count(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.state.borrow().edges.len()
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.state.borrow().nodes.keys().cloned().collect()
    }

    fn edge_ids(&self) -> Vec<EdgeId> {
        self.state.borrow().edges.keys().cloned().collect()
    }

    fn node_id_at(&self, index: usize) -> GraphResult<NodeId> {
        let state = self.state.borrow();
        state
            .nodes
            .get_index(index)
            .map(|(id, _)| id.clone())
            .ok_or(GraphError::IndexOutOfRange {
                kind: ElementKind::Node,
                index,
                len: state.nodes.len(),
            })
    }

    fn edge_id_at(&self, index: usize) -> GraphResult<EdgeId> {
        let state = self.state.borrow();
        state
            .edges
            .get_index(index)
            .map(|(id, _)| id.clone())
            .ok_or(GraphError::IndexOutOfRange {
                kind: ElementKind::Edge,
                index,
                len: state.edges.len(),
            })
    }

    fn edge_endpoints(&self, id: &str) -> Option<EdgeEndpoints> {
        self.state.borrow().edges.get(id).map(|edge| EdgeEndpoints {
            from: edge.from.clone(),
            to: edge.to.clone(),
            directed: edge.directed,
        })
    }

    fn incident_edges(&self, node: &str) -> Vec<EdgeId> {
        incident_of(&self.state.borrow(), node)
    }

    fn node_attribute(&self, id: &str, key: &str) -> Option<AttributeValue> {
        self.state
            .borrow()
            .nodes
            .get(id)
            .and_then(|node| node.attribute(key).cloned())
    }

    fn edge_attribute(&self, id: &str, key: &str) -> Option<AttributeValue> {
        self.state
            .borrow()
            .edges
            .get(id)
            .and_then(|edge| edge.attribute(key).cloned())
    }

    fn node_attribute_keys(&self, id: &str) -> Vec<String> {
        self.state
            .borrow()
            .nodes
            .get(id)
            .map(|node| node.attribute_keys().cloned().collect())
            .unwrap_or_default()
    }

    fn edge_attribute_keys(&self, id: &str) -> Vec<String> {
        self.state
            .borrow()
            .edges
            .get(id)
            .map(|edge| edge.attributes.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn graph_attribute(&self, key: &str) -> Option<AttributeValue> {
        self.state.borrow().attributes.get(key).cloned()
    }

    fn add_node(&self, id: &str) -> GraphResult<()> {
        self.add_node_from(id, None)
    }

    fn add_edge(&self, id: &str, from: &str, to: &str, directed: bool) -> GraphResult<()> {
        self.add_edge_from(id, from, to, directed, None)
    }

    fn remove_node(&self, id: &str) -> GraphResult<()> {
        self.remove_node_from(id, None)
    }

    fn remove_edge(&self, id: &str) -> GraphResult<()> {
        self.remove_edge_from(id, None)
    }

    fn set_node_attribute(&self, id: &str, key: &str, value: AttributeValue) -> GraphResult<()> {
        self.set_node_attribute_from(id, key, value, None)
    }

    fn remove_node_attribute(&self, id: &str, key: &str) -> GraphResult<()> {
        self.remove_node_attribute_from(id, key, None)
    }

    fn set_edge_attribute(&self, id: &str, key: &str, value: AttributeValue) -> GraphResult<()> {
        self.set_edge_attribute_from(id, key, value, None)
    }

    fn remove_edge_attribute(&self, id: &str, key: &str) -> GraphResult<()> {
        self.remove_edge_attribute_from(id, key, None)
    }

    fn set_graph_attribute(&self, key: &str, value: AttributeValue) -> GraphResult<()> {
        self.set_graph_attribute_from(key, value, None)
    }

    fn remove_graph_attribute(&self, key: &str) -> GraphResult<()> {
        self.remove_graph_attribute_from(key, None)
    }

    fn step_begins(&self, step: f64) -> GraphResult<()> {
        self.step_begins_from(step, None)
    }

    fn clear(&self) -> GraphResult<()> {
        self.clear_from(None)
    }

    fn add_sink(&self, sink: SharedSink) {
        self.state.borrow_mut().sinks.add(&sink);
    }

    fn remove_sink(&self, sink: &SharedSink) {
        self.state.borrow_mut().sinks.remove(sink);
    }
}

/// Event-form input: a `GraphStore` can sit at the end of an event pipe and
/// apply incoming events as mutations. Application is guarded by the
/// "already seen" table and lenient about elements that are already in the
/// requested state, so chained pipes converge instead of erroring.
impl Sink for GraphStore {
    fn handle(&mut self, event: &GraphEvent) -> GraphResult<()> {
        let fresh = self
            .state
            .borrow_mut()
            .guard
            .is_new_event(event.source(), event.time());
        if !fresh {
            trace!(source = event.source(), time = event.time(), "event already seen, skipping");
            return Ok(());
        }
        let origin = Some((event.source(), event.time()));
        match event {
            GraphEvent::NodeAdded { node, .. } => {
                if self.contains_node(node.as_str()) {
                    Ok(())
                } else {
                    self.add_node_from(node.as_str(), origin)
                }
            }
            GraphEvent::NodeRemoved { node, .. } => {
                if self.contains_node(node.as_str()) {
                    self.remove_node_from(node.as_str(), origin)
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
                if self.contains_edge(edge.as_str()) {
                    Ok(())
                } else {
                    self.add_edge_from(edge.as_str(), from.as_str(), to.as_str(), *directed, origin)
                }
            }
            GraphEvent::EdgeRemoved { edge, .. } => {
                if self.contains_edge(edge.as_str()) {
                    self.remove_edge_from(edge.as_str(), origin)
                } else {
                    Ok(())
                }
            }
            GraphEvent::NodeAttributeAdded { node, key, value, .. } => {
                if self.contains_node(node.as_str()) {
                    self.set_node_attribute_from(node.as_str(), key, value.clone(), origin)
                } else {
                    Ok(())
                }
            }
            GraphEvent::NodeAttributeChanged { node, key, new, .. } => {
                if self.contains_node(node.as_str()) {
                    self.set_node_attribute_from(node.as_str(), key, new.clone(), origin)
                } else {
                    Ok(())
                }
            }
            GraphEvent::NodeAttributeRemoved { node, key, .. } => {
                if self.contains_node(node.as_str()) {
                    self.remove_node_attribute_from(node.as_str(), key, origin)
                } else {
                    Ok(())
                }
            }
            GraphEvent::EdgeAttributeAdded { edge, key, value, .. } => {
                if self.contains_edge(edge.as_str()) {
                    self.set_edge_attribute_from(edge.as_str(), key, value.clone(), origin)
                } else {
                    Ok(())
                }
            }
            GraphEvent::EdgeAttributeChanged { edge, key, new, .. } => {
                if self.contains_edge(edge.as_str()) {
                    self.set_edge_attribute_from(edge.as_str(), key, new.clone(), origin)
                } else {
                    Ok(())
                }
            }
            GraphEvent::EdgeAttributeRemoved { edge, key, .. } => {
                if self.contains_edge(edge.as_str()) {
                    self.remove_edge_attribute_from(edge.as_str(), key, origin)
                } else {
                    Ok(())
                }
            }
            GraphEvent::GraphAttributeAdded { key, value, .. } => {
                self.set_graph_attribute_from(key, value.clone(), origin)
            }
            GraphEvent::GraphAttributeChanged { key, new, .. } => {
                self.set_graph_attribute_from(key, new.clone(), origin)
            }
            GraphEvent::GraphAttributeRemoved { key, .. } => {
                self.remove_graph_attribute_from(key, origin)
            }
            GraphEvent::GraphCleared { .. } => self.clear_from(origin),
            GraphEvent::StepBegins { step, .. } => self.step_begins_from(*step, origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        events: Vec<GraphEvent>,
    }

    impl Sink for Recorder {
        fn handle(&mut self, event: &GraphEvent) -> GraphResult<()> {
            self.events.push(event.clone());
            Ok(())
        }
    }

    fn recorder() -> Rc<RefCell<Recorder>> {
        Rc::new(RefCell::new(Recorder { events: vec![] }))
    }

    #[test]
    fn test_add_and_get_node() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();

        assert_eq!(store.node_count(), 1);
        assert!(store.contains_node("A"));
        assert_eq!(store.get_node("A").unwrap().id, NodeId::new("A"));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();

        let result = store.add_node("A");
        assert_eq!(result, Err(GraphError::NodeAlreadyExists(NodeId::new("A"))));
    }

    #[test]
    fn test_add_and_get_edge() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();
        store.add_node("B").unwrap();
        store.add_edge("AB", "A", "B", true).unwrap();

        assert_eq!(store.edge_count(), 1);
        let edge = store.get_edge("AB").unwrap();
        assert_eq!(edge.from, NodeId::new("A"));
        assert_eq!(edge.to, NodeId::new("B"));
        assert!(edge.directed);
    }

    #[test]
    fn test_edge_validation() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();

        let result = store.add_edge("XA", "X", "A", false);
        assert_eq!(
            result,
            Err(GraphError::InvalidEdgeSource {
                edge: EdgeId::new("XA"),
                node: NodeId::new("X"),
            })
        );

        let result = store.add_edge("AX", "A", "X", false);
        assert_eq!(
            result,
            Err(GraphError::InvalidEdgeTarget {
                edge: EdgeId::new("AX"),
                node: NodeId::new("X"),
            })
        );
    }

    #[test]
    fn test_incident_edges() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();
        store.add_node("B").unwrap();
        store.add_node("C").unwrap();
        store.add_edge("AB", "A", "B", true).unwrap();
        store.add_edge("AC", "A", "C", true).unwrap();
        store.add_edge("BC", "B", "C", false).unwrap();

        assert_eq!(store.incident_edges("A").len(), 2);
        assert_eq!(store.incident_edges("B").len(), 2);
        assert_eq!(store.incident_edges("C").len(), 2);
        assert_eq!(store.degree("A"), 2);
    }

    #[test]
    fn test_loop_edge_counted_once() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();
        store.add_edge("AA", "A", "A", true).unwrap();

        assert_eq!(store.incident_edges("A"), vec![EdgeId::new("AA")]);
        assert_eq!(store.degree("A"), 1);
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();
        store.add_node("B").unwrap();
        store.add_edge("AB", "A", "B", false).unwrap();

        store.remove_node("A").unwrap();
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.incident_edges("B").len(), 0);
    }

    #[test]
    fn test_removal_event_order() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();
        store.add_node("B").unwrap();
        store.add_node("C").unwrap();
        store.add_edge("AB", "A", "B", true).unwrap();
        store.add_edge("AC", "A", "C", true).unwrap();

        let rec = recorder();
        store.add_sink(rec.clone());

        store.remove_node("A").unwrap();

        let events = rec.borrow().events.clone();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], GraphEvent::EdgeRemoved { .. }));
        assert!(matches!(events[1], GraphEvent::EdgeRemoved { .. }));
        assert!(matches!(
            events[2],
            GraphEvent::NodeRemoved { ref node, .. } if node.as_str() == "A"
        ));
    }

    #[test]
    fn test_attribute_events() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();

        let rec = recorder();
        store.add_sink(rec.clone());

        store
            .set_node_attribute("A", "type", AttributeValue::from("X"))
            .unwrap();
        store
            .set_node_attribute("A", "type", AttributeValue::from("Y"))
            .unwrap();
        store.remove_node_attribute("A", "type").unwrap();
        // removing an absent attribute emits nothing
        store.remove_node_attribute("A", "type").unwrap();

        let events = rec.borrow().events.clone();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            GraphEvent::NodeAttributeAdded { ref key, .. } if key == "type"
        ));
        assert!(matches!(
            events[1],
            GraphEvent::NodeAttributeChanged { ref old, ref new, .. }
                if old.as_string() == Some("X") && new.as_string() == Some("Y")
        ));
        assert!(matches!(events[2], GraphEvent::NodeAttributeRemoved { .. }));
    }

    #[test]
    fn test_index_addressing() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();
        store.add_node("B").unwrap();

        assert_eq!(store.node_id_at(0).unwrap(), NodeId::new("A"));
        assert_eq!(store.node_id_at(1).unwrap(), NodeId::new("B"));
        assert_eq!(
            store.node_id_at(2),
            Err(GraphError::IndexOutOfRange {
                kind: ElementKind::Node,
                index: 2,
                len: 2,
            })
        );
    }

    #[test]
    fn test_clear() {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();
        store.add_node("B").unwrap();
        store.add_edge("AB", "A", "B", false).unwrap();

        let rec = recorder();
        store.add_sink(rec.clone());

        store.clear().unwrap();
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);

        let events = rec.borrow().events.clone();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GraphEvent::GraphCleared { .. }));
    }

    #[test]
    fn test_graph_attributes() {
        let store = GraphStore::new("g");
        store
            .set_graph_attribute("title", AttributeValue::from("demo"))
            .unwrap();
        assert_eq!(
            store.graph_attribute("title").unwrap().as_string(),
            Some("demo")
        );
        store.remove_graph_attribute("title").unwrap();
        assert!(store.graph_attribute("title").is_none());
    }

    #[test]
    fn test_event_form_input_is_guarded() {
        let store = GraphStore::new("replica");
        let mut pipe = store.clone();

        let event = GraphEvent::NodeAdded {
            source: "upstream".to_string(),
            time: 1,
            node: NodeId::new("A"),
        };
        pipe.handle(&event).unwrap();
        assert!(store.contains_node("A"));

        // the same event a second time is a no-op
        pipe.handle(&event).unwrap();
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_event_form_input_preserves_stamps() {
        let store = GraphStore::new("replica");
        let rec = recorder();
        store.add_sink(rec.clone());

        let mut pipe = store.clone();
        pipe.handle(&GraphEvent::NodeAdded {
            source: "upstream".to_string(),
            time: 9,
            node: NodeId::new("A"),
        })
        .unwrap();

        let events = rec.borrow().events.clone();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source(), "upstream");
        assert_eq!(events[0].time(), 9);
    }
}
