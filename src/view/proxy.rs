//! View-local stand-ins for included base elements
//!
//! Proxies are plain records owned by the view's index tables. They refer
//! to the base graph by identifier only, never by reference, so the view
//! has no ownership cycles.

use super::table::Indexed;
use crate::graph::types::{EdgeId, NodeId};

/// Stand-in for an included node, carrying the view-local degree counters.
///
/// An undirected incident edge moves in- and out-degree together; a
/// directed edge moves only the side matching its orientation; a loop is
/// registered once and moves both sides. Total degree always equals the
/// number of distinct included incident edges.
#[derive(Debug, Clone)]
pub(crate) struct NodeProxy {
    pub id: NodeId,
    pub index: usize,
    pub in_degree: usize,
    pub out_degree: usize,
    pub degree: usize,
}

impl NodeProxy {
    pub fn new(id: NodeId) -> Self {
        NodeProxy {
            id,
            index: 0,
            in_degree: 0,
            out_degree: 0,
            degree: 0,
        }
    }

    /// Account for a newly included incident edge.
    pub fn register(&mut self, edge: &EdgeProxy) {
        if edge.is_loop() || !edge.directed {
            self.in_degree += 1;
            self.out_degree += 1;
        } else if edge.from == self.id {
            self.out_degree += 1;
        } else {
            self.in_degree += 1;
        }
        self.degree += 1;
    }

    /// Release the counters of a no-longer-included incident edge.
    pub fn unregister(&mut self, edge: &EdgeProxy) {
        if edge.is_loop() || !edge.directed {
            self.in_degree -= 1;
            self.out_degree -= 1;
        } else if edge.from == self.id {
            self.out_degree -= 1;
        } else {
            self.in_degree -= 1;
        }
        self.degree -= 1;
    }
}

impl Indexed for NodeProxy {
    fn index(&self) -> usize {
        self.index
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

/// Stand-in for an included edge.
///
/// Endpoints and orientation are cached from the inclusion event so that
/// removal bookkeeping never needs the base element, which may already be
/// gone when the removal event arrives.
#[derive(Debug, Clone)]
pub(crate) struct EdgeProxy {
    pub id: EdgeId,
    pub index: usize,
    pub from: NodeId,
    pub to: NodeId,
    pub directed: bool,
}

impl EdgeProxy {
    pub fn new(id: EdgeId, from: NodeId, to: NodeId, directed: bool) -> Self {
        EdgeProxy {
            id,
            index: 0,
            from,
            to,
            directed,
        }
    }

    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

impl Indexed for EdgeProxy {
    fn index(&self) -> usize {
        self.index
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}
