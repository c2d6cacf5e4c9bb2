//! Membership engine
//!
//! Maintains the view's element population from the base graph's mutation
//! events: one two-state machine (excluded/included) per element, with
//! degree bookkeeping, dense index slots and synthetic event emission.
//!
//! The engine never reorders events. It relies on the base graph emitting
//! node events before the events of their edges; an edge selected for
//! inclusion whose endpoint cannot be resolved means that contract was
//! broken and is reported as a fatal error instead of being papered over
//! with skipped degree bookkeeping.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::proxy::{EdgeProxy, NodeProxy};
use super::table::IndexTable;
use crate::error::{GraphError, GraphResult};
use crate::filter::Predicate;
use crate::graph::attribute::AttributeMap;
use crate::graph::types::{EdgeId, ElementKind, NodeId};
use crate::graph::{EdgeEndpoints, GraphBase};
use crate::stream::{GraphEvent, SinkList, SinkTime, SourceTime};

/// Membership representation, chosen at construction.
pub(crate) enum Membership {
    /// Live proxy mode: proxies with degree counters in dense index tables.
    Proxies {
        nodes: IndexTable<NodeProxy>,
        node_index: FxHashMap<NodeId, usize>,
        edges: IndexTable<EdgeProxy>,
        edge_index: FxHashMap<EdgeId, usize>,
    },
    /// Snapshot mode: identifier sets only, no per-element state.
    Identifiers {
        nodes: IndexSet<NodeId>,
        edges: IndexSet<EdgeId>,
    },
}

impl Membership {
    pub fn proxies() -> Self {
        Membership::Proxies {
            nodes: IndexTable::new(),
            node_index: FxHashMap::default(),
            edges: IndexTable::new(),
            edge_index: FxHashMap::default(),
        }
    }

    pub fn identifiers() -> Self {
        Membership::Identifiers {
            nodes: IndexSet::new(),
            edges: IndexSet::new(),
        }
    }

    fn tracks_proxies(&self) -> bool {
        matches!(self, Membership::Proxies { .. })
    }

    pub fn contains_node(&self, id: &str) -> bool {
        match self {
            Membership::Proxies { node_index, .. } => node_index.contains_key(id),
            Membership::Identifiers { nodes, .. } => nodes.contains(id),
        }
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        match self {
            Membership::Proxies { edge_index, .. } => edge_index.contains_key(id),
            Membership::Identifiers { edges, .. } => edges.contains(id),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Membership::Proxies { nodes, .. } => nodes.len(),
            Membership::Identifiers { nodes, .. } => nodes.len(),
        }
    }

    pub fn edge_count(&self) -> usize {
        match self {
            Membership::Proxies { edges, .. } => edges.len(),
            Membership::Identifiers { edges, .. } => edges.len(),
        }
    }

    pub fn node_id_at(&self, index: usize) -> Option<NodeId> {
        match self {
            Membership::Proxies { nodes, .. } => nodes.get(index).map(|proxy| proxy.id.clone()),
            Membership::Identifiers { nodes, .. } => nodes.get_index(index).cloned(),
        }
    }

    pub fn edge_id_at(&self, index: usize) -> Option<EdgeId> {
        match self {
            Membership::Proxies { edges, .. } => edges.get(index).map(|proxy| proxy.id.clone()),
            Membership::Identifiers { edges, .. } => edges.get_index(index).cloned(),
        }
    }

    pub fn node_index_of(&self, id: &str) -> Option<usize> {
        match self {
            Membership::Proxies { node_index, .. } => node_index.get(id).copied(),
            Membership::Identifiers { nodes, .. } => nodes.get_index_of(id),
        }
    }

    pub fn edge_index_of(&self, id: &str) -> Option<usize> {
        match self {
            Membership::Proxies { edge_index, .. } => edge_index.get(id).copied(),
            Membership::Identifiers { edges, .. } => edges.get_index_of(id),
        }
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        match self {
            Membership::Proxies { nodes, .. } => nodes.iter().map(|proxy| proxy.id.clone()).collect(),
            Membership::Identifiers { nodes, .. } => nodes.iter().cloned().collect(),
        }
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        match self {
            Membership::Proxies { edges, .. } => edges.iter().map(|proxy| proxy.id.clone()).collect(),
            Membership::Identifiers { edges, .. } => edges.iter().cloned().collect(),
        }
    }

    /// View-local degree counters `(in, out, total)`; only tracked in
    /// proxy mode.
    pub fn degrees(&self, id: &str) -> Option<(usize, usize, usize)> {
        match self {
            Membership::Proxies {
                nodes, node_index, ..
            } => node_index
                .get(id)
                .and_then(|&index| nodes.get(index))
                .map(|proxy| (proxy.in_degree, proxy.out_degree, proxy.degree)),
            Membership::Identifiers { .. } => None,
        }
    }

    /// Endpoint data cached at inclusion time; only present in proxy mode.
    pub fn cached_endpoints(&self, id: &str) -> Option<EdgeEndpoints> {
        match self {
            Membership::Proxies {
                edges, edge_index, ..
            } => edge_index
                .get(id)
                .and_then(|&index| edges.get(index))
                .map(|proxy| EdgeEndpoints {
                    from: proxy.from.clone(),
                    to: proxy.to.clone(),
                    directed: proxy.directed,
                }),
            Membership::Identifiers { .. } => None,
        }
    }

    /// Included edges with the given node as an endpoint.
    pub fn edges_touching(&self, node: &str, base: &dyn GraphBase) -> Vec<EdgeId> {
        match self {
            Membership::Proxies { edges, .. } => edges
                .iter()
                .filter(|proxy| proxy.from.as_str() == node || proxy.to.as_str() == node)
                .map(|proxy| proxy.id.clone())
                .collect(),
            Membership::Identifiers { edges, .. } => base
                .incident_edges(node)
                .into_iter()
                .filter(|edge| edges.contains(edge))
                .collect(),
        }
    }

    fn insert_node(&mut self, id: NodeId) {
        match self {
            Membership::Proxies {
                nodes, node_index, ..
            } => {
                let index = nodes.push(NodeProxy::new(id.clone()));
                node_index.insert(id, index);
            }
            Membership::Identifiers { nodes, .. } => {
                nodes.insert(id);
            }
        }
    }

    fn insert_edge(&mut self, proxy: EdgeProxy) {
        match self {
            Membership::Proxies {
                nodes,
                node_index,
                edges,
                edge_index,
            } => {
                let loop_edge = proxy.is_loop();
                if let Some(&index) = node_index.get(&proxy.from) {
                    if let Some(node) = nodes.get_mut(index) {
                        node.register(&proxy);
                    }
                }
                if !loop_edge {
                    if let Some(&index) = node_index.get(&proxy.to) {
                        if let Some(node) = nodes.get_mut(index) {
                            node.register(&proxy);
                        }
                    }
                }
                let id = proxy.id.clone();
                let index = edges.push(proxy);
                edge_index.insert(id, index);
            }
            Membership::Identifiers { edges, .. } => {
                edges.insert(proxy.id);
            }
        }
    }

    fn remove_node(&mut self, id: &str) {
        match self {
            Membership::Proxies {
                nodes, node_index, ..
            } => {
                if let Some(index) = node_index.remove(id) {
                    let moved_id = {
                        let (_, moved) = nodes.swap_remove(index);
                        moved.map(|proxy| proxy.id.clone())
                    };
                    if let Some(moved_id) = moved_id {
                        node_index.insert(moved_id, index);
                    }
                }
            }
            Membership::Identifiers { nodes, .. } => {
                nodes.swap_remove(id);
            }
        }
    }

    fn remove_edge(&mut self, id: &str) {
        match self {
            Membership::Proxies {
                nodes,
                node_index,
                edges,
                edge_index,
            } => {
                if let Some(index) = edge_index.remove(id) {
                    let (removed, moved_id) = {
                        let (removed, moved) = edges.swap_remove(index);
                        (removed, moved.map(|proxy| proxy.id.clone()))
                    };
                    if let Some(moved_id) = moved_id {
                        edge_index.insert(moved_id, index);
                    }
                    let loop_edge = removed.is_loop();
                    if let Some(&node) = node_index.get(&removed.from) {
                        if let Some(proxy) = nodes.get_mut(node) {
                            proxy.unregister(&removed);
                        }
                    }
                    if !loop_edge {
                        if let Some(&node) = node_index.get(&removed.to) {
                            if let Some(proxy) = nodes.get_mut(node) {
                                proxy.unregister(&removed);
                            }
                        }
                    }
                }
            }
            Membership::Identifiers { edges, .. } => {
                edges.swap_remove(id);
            }
        }
    }

    fn clear(&mut self) {
        match self {
            Membership::Proxies {
                nodes,
                node_index,
                edges,
                edge_index,
            } => {
                nodes.clear();
                node_index.clear();
                edges.clear();
                edge_index.clear();
            }
            Membership::Identifiers { nodes, edges } => {
                nodes.clear();
                edges.clear();
            }
        }
    }
}

/// Shared state of one view, driven by [`process`](ViewCore::process).
pub(crate) struct ViewCore {
    pub id: String,
    pub node_filter: Predicate,
    pub edge_filter: Predicate,
    pub strict: bool,
    pub membership: Membership,
    pub attributes: AttributeMap,
    pub sinks: SinkList,
    pub time: SourceTime,
    pub guard: SinkTime,
}

impl ViewCore {
    pub fn new(
        id: String,
        node_filter: Predicate,
        edge_filter: Predicate,
        strict: bool,
        membership: Membership,
    ) -> Self {
        ViewCore {
            time: SourceTime::new(id.clone()),
            id,
            node_filter,
            edge_filter,
            strict,
            membership,
            attributes: AttributeMap::new(),
            sinks: SinkList::new(),
            guard: SinkTime::new(),
        }
    }

    pub fn new_event_time(&mut self) -> u64 {
        let ViewCore { time, guard, .. } = self;
        time.new_event(guard)
    }

    /// Initial scan over the base graph at construction.
    ///
    /// Synthetic events are discarded: no observer can be registered yet.
    pub fn populate(&mut self, base: &dyn GraphBase) -> GraphResult<()> {
        let mut discard = Vec::new();
        for node in base.node_ids() {
            if self
                .node_filter
                .eval(ElementKind::Node, node.as_str(), base)
            {
                self.include_node(&node, &mut discard);
            }
        }
        for edge in base.edge_ids() {
            if self
                .edge_filter
                .eval(ElementKind::Edge, edge.as_str(), base)
            {
                if let Some(endpoints) = base.edge_endpoints(edge.as_str()) {
                    self.include_edge(
                        &edge,
                        &endpoints.from,
                        &endpoints.to,
                        endpoints.directed,
                        &mut discard,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Apply one base-graph event, returning the synthetic and relayed
    /// events to deliver downstream, in order.
    pub fn process(
        &mut self,
        event: &GraphEvent,
        base: &dyn GraphBase,
    ) -> GraphResult<Vec<GraphEvent>> {
        let mut out = Vec::new();
        match event {
            GraphEvent::NodeAdded { node, .. } => {
                if self
                    .node_filter
                    .eval(ElementKind::Node, node.as_str(), base)
                {
                    self.include_node(node, &mut out);
                }
            }
            GraphEvent::NodeRemoved { node, .. } => {
                self.drop_node(node, base, &mut out);
            }
            GraphEvent::EdgeAdded {
                edge,
                from,
                to,
                directed,
                ..
            } => {
                if self
                    .edge_filter
                    .eval(ElementKind::Edge, edge.as_str(), base)
                {
                    self.include_edge(edge, from, to, *directed, &mut out)?;
                }
            }
            GraphEvent::EdgeRemoved { edge, .. } => {
                self.drop_edge(edge, &mut out);
            }
            GraphEvent::NodeAttributeAdded { node, .. }
            | GraphEvent::NodeAttributeChanged { node, .. }
            | GraphEvent::NodeAttributeRemoved { node, .. } => {
                self.reevaluate_node(node, event, base, &mut out)?;
            }
            GraphEvent::EdgeAttributeAdded { edge, .. }
            | GraphEvent::EdgeAttributeChanged { edge, .. }
            | GraphEvent::EdgeAttributeRemoved { edge, .. } => {
                self.reevaluate_edge(edge, event, base, &mut out)?;
            }
            GraphEvent::GraphAttributeAdded { .. }
            | GraphEvent::GraphAttributeChanged { .. }
            | GraphEvent::GraphAttributeRemoved { .. } => {
                // the view keeps its own graph-level attributes
            }
            GraphEvent::GraphCleared { .. } => {
                self.membership.clear();
                out.push(event.clone());
            }
            GraphEvent::StepBegins { .. } => {
                out.push(event.clone());
            }
        }
        Ok(out)
    }

    fn include_node(&mut self, id: &NodeId, out: &mut Vec<GraphEvent>) {
        if self.membership.contains_node(id.as_str()) {
            return;
        }
        debug!(node = %id, view = %self.id, "including node");
        self.membership.insert_node(id.clone());
        let time = self.new_event_time();
        out.push(GraphEvent::NodeAdded {
            source: self.id.clone(),
            time,
            node: id.clone(),
        });
    }

    fn include_edge(
        &mut self,
        id: &EdgeId,
        from: &NodeId,
        to: &NodeId,
        directed: bool,
        out: &mut Vec<GraphEvent>,
    ) -> GraphResult<()> {
        if self.membership.contains_edge(id.as_str()) {
            return Ok(());
        }
        if self.membership.tracks_proxies() {
            if !self.membership.contains_node(from.as_str()) {
                return Err(GraphError::UnresolvedEndpoint {
                    edge: id.clone(),
                    node: from.clone(),
                });
            }
            if !self.membership.contains_node(to.as_str()) {
                return Err(GraphError::UnresolvedEndpoint {
                    edge: id.clone(),
                    node: to.clone(),
                });
            }
        }
        debug!(edge = %id, view = %self.id, "including edge");
        self.membership
            .insert_edge(EdgeProxy::new(id.clone(), from.clone(), to.clone(), directed));
        let time = self.new_event_time();
        out.push(GraphEvent::EdgeAdded {
            source: self.id.clone(),
            time,
            edge: id.clone(),
            from: from.clone(),
            to: to.clone(),
            directed,
        });
        Ok(())
    }

    fn drop_edge(&mut self, id: &EdgeId, out: &mut Vec<GraphEvent>) {
        if !self.membership.contains_edge(id.as_str()) {
            return;
        }
        debug!(edge = %id, view = %self.id, "excluding edge");
        let time = self.new_event_time();
        out.push(GraphEvent::EdgeRemoved {
            source: self.id.clone(),
            time,
            edge: id.clone(),
        });
        self.membership.remove_edge(id.as_str());
    }

    fn drop_node(&mut self, id: &NodeId, base: &dyn GraphBase, out: &mut Vec<GraphEvent>) {
        if !self.membership.contains_node(id.as_str()) {
            return;
        }
        // still-included incident edges leave first
        for edge in self.membership.edges_touching(id.as_str(), base) {
            self.drop_edge(&edge, out);
        }
        debug!(node = %id, view = %self.id, "excluding node");
        let time = self.new_event_time();
        out.push(GraphEvent::NodeRemoved {
            source: self.id.clone(),
            time,
            node: id.clone(),
        });
        self.membership.remove_node(id.as_str());
    }

    /// Attribute event on a node: relay it when the node was a member,
    /// then run the inclusion state machine, then re-check the node's
    /// incident edges so inter-edge predicates follow suit. An edge's
    /// synthetic added event therefore never precedes its endpoint's.
    fn reevaluate_node(
        &mut self,
        id: &NodeId,
        event: &GraphEvent,
        base: &dyn GraphBase,
        out: &mut Vec<GraphEvent>,
    ) -> GraphResult<()> {
        let was = self.membership.contains_node(id.as_str());
        let now = base.contains_node(id.as_str())
            && self
                .node_filter
                .eval(ElementKind::Node, id.as_str(), base);

        if was {
            out.push(event.clone());
        }
        match (was, now) {
            (false, true) => {
                self.include_node(id, out);
                self.reevaluate_incident_edges(id, base, out)?;
            }
            (true, false) => {
                self.drop_node(id, base, out);
            }
            (true, true) => {
                self.reevaluate_incident_edges(id, base, out)?;
            }
            (false, false) => {}
        }
        Ok(())
    }

    fn reevaluate_edge(
        &mut self,
        id: &EdgeId,
        event: &GraphEvent,
        base: &dyn GraphBase,
        out: &mut Vec<GraphEvent>,
    ) -> GraphResult<()> {
        let was = self.membership.contains_edge(id.as_str());
        let now = base.contains_edge(id.as_str())
            && self
                .edge_filter
                .eval(ElementKind::Edge, id.as_str(), base);

        if was {
            out.push(event.clone());
        }
        match (was, now) {
            (false, true) => {
                if let Some(endpoints) = base.edge_endpoints(id.as_str()) {
                    self.include_edge(id, &endpoints.from, &endpoints.to, endpoints.directed, out)?;
                }
            }
            (true, false) => {
                self.drop_edge(id, out);
            }
            _ => {}
        }
        Ok(())
    }

    fn reevaluate_incident_edges(
        &mut self,
        node: &NodeId,
        base: &dyn GraphBase,
        out: &mut Vec<GraphEvent>,
    ) -> GraphResult<()> {
        for edge in base.incident_edges(node.as_str()) {
            let member = self.membership.contains_edge(edge.as_str());
            let selected = self
                .edge_filter
                .eval(ElementKind::Edge, edge.as_str(), base);
            if selected && !member {
                if let Some(endpoints) = base.edge_endpoints(edge.as_str()) {
                    trace!(edge = %edge, node = %node, view = %self.id, "inter-edge inclusion");
                    self.include_edge(
                        &edge,
                        &endpoints.from,
                        &endpoints.to,
                        endpoints.directed,
                        out,
                    )?;
                }
            } else if !selected && member {
                self.drop_edge(&edge, out);
            }
        }
        Ok(())
    }
}
