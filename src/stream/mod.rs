//! Mutation-event stream plumbing
//!
//! Graph surfaces announce every mutation to their registered sinks,
//! synchronously and in mutation order. Sinks are held weakly: dropping the
//! owning handle detaches the sink on the next dispatch.

pub mod event;
pub mod sync;

pub use event::GraphEvent;
pub use sync::{SinkTime, SourceTime};

use crate::error::GraphResult;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Receiver of graph mutation events.
///
/// Handlers run inside the mutation call that produced the event. Returning
/// an error aborts the remaining dispatch and propagates to the mutation
/// caller.
pub trait Sink {
    fn handle(&mut self, event: &GraphEvent) -> GraphResult<()>;
}

/// Shared handle to a sink, as stored in sink registries.
pub type SharedSink = Rc<RefCell<dyn Sink>>;

/// Registry of sinks attached to one event source.
#[derive(Default)]
pub struct SinkList {
    sinks: Vec<Weak<RefCell<dyn Sink>>>,
}

impl SinkList {
    pub fn new() -> Self {
        SinkList { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: &SharedSink) {
        self.sinks.push(Rc::downgrade(sink));
    }

    pub fn remove(&mut self, sink: &SharedSink) {
        let target = Rc::as_ptr(sink) as *const ();
        self.sinks.retain(|weak| match weak.upgrade() {
            Some(live) => Rc::as_ptr(&live) as *const () != target,
            None => false,
        });
    }

    /// Upgrades the live sinks, pruning dead entries.
    pub fn snapshot(&mut self) -> Vec<SharedSink> {
        self.sinks.retain(|weak| weak.strong_count() > 0);
        self.sinks.iter().filter_map(Weak::upgrade).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.iter().all(|weak| weak.strong_count() == 0)
    }
}

/// Delivers one event to each sink in registration order.
///
/// Must be called with no graph-state borrow held: handlers are free to
/// re-enter the graph surface that emitted the event.
pub fn dispatch(sinks: &[SharedSink], event: &GraphEvent) -> GraphResult<()> {
    for sink in sinks {
        sink.borrow_mut().handle(event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::NodeId;

    struct Recorder {
        events: Vec<GraphEvent>,
    }

    impl Sink for Recorder {
        fn handle(&mut self, event: &GraphEvent) -> GraphResult<()> {
            self.events.push(event.clone());
            Ok(())
        }
    }

    fn node_added(time: u64) -> GraphEvent {
        GraphEvent::NodeAdded {
            source: "g".to_string(),
            time,
            node: NodeId::new("A"),
        }
    }

    #[test]
    fn test_dispatch_order() {
        let recorder: Rc<RefCell<Recorder>> = Rc::new(RefCell::new(Recorder { events: vec![] }));
        let sink: SharedSink = recorder.clone();

        let mut list = SinkList::new();
        list.add(&sink);

        let sinks = list.snapshot();
        dispatch(&sinks, &node_added(1)).unwrap();
        dispatch(&sinks, &node_added(2)).unwrap();

        let events = &recorder.borrow().events;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].time(), 1);
        assert_eq!(events[1].time(), 2);
    }

    #[test]
    fn test_dropped_sink_is_pruned() {
        let mut list = SinkList::new();
        {
            let recorder: Rc<RefCell<Recorder>> =
                Rc::new(RefCell::new(Recorder { events: vec![] }));
            let sink: SharedSink = recorder.clone();
            list.add(&sink);
            assert_eq!(list.snapshot().len(), 1);
        }
        assert!(list.is_empty());
        assert_eq!(list.snapshot().len(), 0);
    }

    #[test]
    fn test_remove_sink() {
        let recorder: Rc<RefCell<Recorder>> = Rc::new(RefCell::new(Recorder { events: vec![] }));
        let sink: SharedSink = recorder.clone();

        let mut list = SinkList::new();
        list.add(&sink);
        list.remove(&sink);
        assert_eq!(list.snapshot().len(), 0);
    }
}
