// crates/streamsentry-core/src/seen_ids.rs
//
// Per-session de-duplication memo for video events. Single-writer (the
// video analysis worker); never shrinks during a session.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct SeenIdsTable {
    seen: HashMap<i64, HashSet<i64>>,
}

impl SeenIdsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `(class_id, track_id)` if it hasn't been seen before.
    /// Returns `true` the first time a pair is recorded — that's the
    /// caller's signal to emit an event.
    pub fn record_if_new(&mut self, class_id: i64, track_id: i64) -> bool {
        self.seen.entry(class_id).or_default().insert(track_id)
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
