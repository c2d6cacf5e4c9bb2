//! Event-source timestamp bookkeeping
//!
//! When graph surfaces are chained into pipes, an event can travel a cycle
//! and come back to the source that caused it. Each relay therefore keeps a
//! "last seen (source, time)" table and drops events it has already
//! processed. A source records its own emissions in its paired table, so a
//! self-originated event is rejected the moment it re-enters.

use rustc_hash::FxHashMap;

/// Tracks the last event time seen from each source.
#[derive(Debug, Default)]
pub struct SinkTime {
    last_seen: FxHashMap<String, u64>,
}

impl SinkTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true iff `(source, time)` has not been processed yet, and
    /// records it as processed.
    pub fn is_new_event(&mut self, source: &str, time: u64) -> bool {
        match self.last_seen.get_mut(source) {
            Some(last) if *last >= time => false,
            Some(last) => {
                *last = time;
                true
            }
            None => {
                self.last_seen.insert(source.to_string(), time);
                true
            }
        }
    }
}

/// Monotonic event clock for a single source.
#[derive(Debug)]
pub struct SourceTime {
    source_id: String,
    time: u64,
}

impl SourceTime {
    pub fn new(source_id: impl Into<String>) -> Self {
        SourceTime {
            source_id: source_id.into(),
            time: 0,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Allocates the next event time, pre-recording it in the paired sink
    /// table so this source rejects its own events on re-entry.
    pub fn new_event(&mut self, guard: &mut SinkTime) -> u64 {
        self.time += 1;
        guard.is_new_event(&self.source_id, self.time);
        self.time
    }
}
