//! Relay between the base graph's event stream and the view
//!
//! The relay is the sink a view registers on its base graph. It feeds every
//! base event to the membership engine, then forwards the engine's
//! synthetic output downstream. Forwarding happens with no view borrow
//! held, so downstream observers are free to query the view or write
//! through it from inside their handlers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::GraphResult;
use crate::graph::GraphBase;
use crate::stream::{dispatch, GraphEvent, Sink};

use super::engine::ViewCore;

pub(crate) struct BaseRelay {
    pub core: Weak<RefCell<ViewCore>>,
    pub base: Rc<dyn GraphBase>,
}

impl Sink for BaseRelay {
    fn handle(&mut self, event: &GraphEvent) -> GraphResult<()> {
        let Some(core) = self.core.upgrade() else {
            // every view handle is gone; nothing left to maintain
            return Ok(());
        };
        let out = core.borrow_mut().process(event, self.base.as_ref())?;
        if out.is_empty() {
            return Ok(());
        }
        let sinks = core.borrow_mut().sinks.snapshot();
        if sinks.is_empty() {
            return Ok(());
        }
        for synthetic in &out {
            dispatch(&sinks, synthetic)?;
        }
        Ok(())
    }
}
