//! Predicate-filtered views over a base graph
//!
//! This module implements the derived view surface:
//! - Proxy elements standing in for included base elements, with
//!   view-local indices and degree counters
//! - Dense index tables giving O(1) indexed access and O(1) removal
//! - The membership engine keeping the population synchronized with the
//!   base graph's mutation stream
//! - The event relay: synthetic events for downstream observers, and
//!   write-through of mutations issued on the view

mod engine;
mod proxy;
mod relay;
mod table;

pub mod element;
pub mod graph;

// Re-export main types
pub use element::{FilteredEdge, FilteredNode};
pub use graph::{FilteredGraph, ViewMode, ViewOptions};
