//! Drishti
//!
//! Live, predicate-filtered views over mutating property graphs.
//!
//! A [`GraphStore`] is a canonical in-memory graph: nodes and edges with
//! string identifiers and typed attributes, announcing every mutation to
//! registered sinks as a synchronous [`GraphEvent`]. A [`FilteredGraph`]
//! is a derived view over any [`GraphBase`]: its population always matches
//! the elements currently satisfying its inclusion [`Predicate`]s, with
//! identifier lookup, dense index addressing and per-node degree counters
//! maintained incrementally from the base event stream. Views forward
//! their own synthetic events downstream and forward writes back to the
//! base, so views observe, stack and pipe like ordinary graphs.
//!
//! # Architecture
//!
//! - [`graph`]: the base graph (elements, attributes, store, the
//!   [`GraphBase`] trait)
//! - [`stream`]: the mutation-event vocabulary, sink registration and the
//!   (source, time) tables that keep chained pipes loop-free
//! - [`filter`]: the inclusion predicate algebra
//! - [`view`]: proxies, dense index tables, the membership engine and the
//!   filtered graph surface
//!
//! Everything is single-threaded and callback-driven: events are
//! dispatched synchronously inside the mutation call that caused them,
//! and there is no queueing or background work anywhere.
//!
//! # Example
//!
//! ```
//! use drishti::{AttributeValue, FilteredGraph, GraphBase, GraphStore, Predicate};
//!
//! # fn main() -> drishti::GraphResult<()> {
//! let store = GraphStore::new("net");
//! store.add_node("a")?;
//! store.add_node("b")?;
//! store.set_node_attribute("a", "kind", AttributeValue::from("router"))?;
//! store.set_node_attribute("b", "kind", AttributeValue::from("host"))?;
//! store.add_edge("ab", "a", "b", true)?;
//!
//! let routers = FilteredGraph::new(
//!     "routers",
//!     &store,
//!     Predicate::attribute_equals("kind", "router"),
//!     Predicate::both_endpoints(Predicate::attribute_equals("kind", "router")),
//! )?;
//! assert_eq!(routers.node_count(), 1);
//! assert_eq!(routers.edge_count(), 0);
//!
//! // mutate the base graph and the view follows
//! store.set_node_attribute("b", "kind", AttributeValue::from("router"))?;
//! assert_eq!(routers.node_count(), 2);
//! assert_eq!(routers.edge_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod graph;
pub mod stream;
pub mod view;

pub use error::{GraphError, GraphResult};
pub use filter::Predicate;
pub use graph::{
    AttributeMap, AttributeValue, Edge, EdgeEndpoints, EdgeId, ElementKind, GraphBase, GraphStore,
    Node, NodeId,
};
pub use stream::{GraphEvent, SharedSink, Sink};
pub use view::{FilteredEdge, FilteredGraph, FilteredNode, ViewMode, ViewOptions};
