//! Graph mutation events
//!
//! Every mutation of a graph surface is announced to registered sinks as one
//! of these events, synchronously, in the order the mutations happened. Each
//! event carries the identifier of the source that stamped it and that
//! source's logical event time, which together drive loop prevention when
//! sources are chained (see [`super::sync`]).

use crate::graph::attribute::AttributeValue;
use crate::graph::types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    NodeAdded {
        source: String,
        time: u64,
        node: NodeId,
    },
    NodeRemoved {
        source: String,
        time: u64,
        node: NodeId,
    },
    EdgeAdded {
        source: String,
        time: u64,
        edge: EdgeId,
        from: NodeId,
        to: NodeId,
        directed: bool,
    },
    EdgeRemoved {
        source: String,
        time: u64,
        edge: EdgeId,
    },
    NodeAttributeAdded {
        source: String,
        time: u64,
        node: NodeId,
        key: String,
        value: AttributeValue,
    },
    NodeAttributeChanged {
        source: String,
        time: u64,
        node: NodeId,
        key: String,
        old: AttributeValue,
        new: AttributeValue,
    },
    NodeAttributeRemoved {
        source: String,
        time: u64,
        node: NodeId,
        key: String,
    },
    EdgeAttributeAdded {
        source: String,
        time: u64,
        edge: EdgeId,
        key: String,
        value: AttributeValue,
    },
    EdgeAttributeChanged {
        source: String,
        time: u64,
        edge: EdgeId,
        key: String,
        old: AttributeValue,
        new: AttributeValue,
    },
    EdgeAttributeRemoved {
        source: String,
        time: u64,
        edge: EdgeId,
        key: String,
    },
    GraphAttributeAdded {
        source: String,
        time: u64,
        key: String,
        value: AttributeValue,
    },
    GraphAttributeChanged {
        source: String,
        time: u64,
        key: String,
        old: AttributeValue,
        new: AttributeValue,
    },
    GraphAttributeRemoved {
        source: String,
        time: u64,
        key: String,
    },
    GraphCleared {
        source: String,
        time: u64,
    },
    StepBegins {
        source: String,
        time: u64,
        step: f64,
    },
}

impl GraphEvent {
    /// Identifier of the source that stamped this event
    pub fn source(&self) -> &str {
        match self {
            GraphEvent::NodeAdded { source, .. }
            | GraphEvent::NodeRemoved { source, .. }
            | GraphEvent::EdgeAdded { source, .. }
            | GraphEvent::EdgeRemoved { source, .. }
            | GraphEvent::NodeAttributeAdded { source, .. }
            | GraphEvent::NodeAttributeChanged { source, .. }
            | GraphEvent::NodeAttributeRemoved { source, .. }
            | GraphEvent::EdgeAttributeAdded { source, .. }
            | GraphEvent::EdgeAttributeChanged { source, .. }
            | GraphEvent::EdgeAttributeRemoved { source, .. }
            | GraphEvent::GraphAttributeAdded { source, .. }
            | GraphEvent::GraphAttributeChanged { source, .. }
            | GraphEvent::GraphAttributeRemoved { source, .. }
            | GraphEvent::GraphCleared { source, .. }
            | GraphEvent::StepBegins { source, .. } => source,
        }
    }

    /// Logical event time assigned by the stamping source
    pub fn time(&self) -> u64 {
        match self {
            GraphEvent::NodeAdded { time, .. }
            | GraphEvent::NodeRemoved { time, .. }
            | GraphEvent::EdgeAdded { time, .. }
            | GraphEvent::EdgeRemoved { time, .. }
            | GraphEvent::NodeAttributeAdded { time, .. }
            | GraphEvent::NodeAttributeChanged { time, .. }
            | GraphEvent::NodeAttributeRemoved { time, .. }
            | GraphEvent::EdgeAttributeAdded { time, .. }
            | GraphEvent::EdgeAttributeChanged { time, .. }
            | GraphEvent::EdgeAttributeRemoved { time, .. }
            | GraphEvent::GraphAttributeAdded { time, .. }
            | GraphEvent::GraphAttributeChanged { time, .. }
            | GraphEvent::GraphAttributeRemoved { time, .. }
            | GraphEvent::GraphCleared { time, .. }
            | GraphEvent::StepBegins { time, .. } => *time,
        }
    }
}
