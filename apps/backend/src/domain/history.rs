//! Bounded log of completed session results.
//!
//! Unlike the rest of the session state, the history's lifetime is
//! process-wide: it survives every session reset and is servable at any
//! time, even mid-game to a newly connecting observer.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One player's result captured at game over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub composition: Value,
}

/// Newest-first collection, bounded at a fixed capacity with eviction from
/// the tail.
#[derive(Debug)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend each entry, then evict the oldest past capacity.
    pub fn record(&mut self, entries: Vec<HistoryEntry>) {
        for entry in entries {
            self.entries.push_front(entry);
        }
        self.entries.truncate(self.capacity);
    }

    /// Read-only snapshot, newest first.
    pub fn fetch(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(name: &str) -> HistoryEntry {
        HistoryEntry {
            name: name.to_string(),
            composition: json!([name, "verse"]),
        }
    }

    #[test]
    fn newest_entries_sit_at_the_front() {
        let mut log = HistoryLog::new(10);
        assert!(log.is_empty());
        log.record(vec![entry("first")]);
        log.record(vec![entry("second")]);
        let entries = log.fetch();
        assert_eq!(entries[0].name, "second");
        assert_eq!(entries[1].name, "first");
    }

    #[test]
    fn capacity_overflow_evicts_the_oldest() {
        let mut log = HistoryLog::new(3);
        for name in ["a", "b", "c", "d"] {
            log.record(vec![entry(name)]);
        }
        let entries = log.fetch();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "d");
        assert!(entries.iter().all(|e| e.name != "a"));
    }

    #[test]
    fn batch_record_prepends_each_entry() {
        let mut log = HistoryLog::new(10);
        log.record(vec![entry("a"), entry("b"), entry("c")]);
        let entries = log.fetch();
        assert_eq!(entries.len(), 3);
        // Entries are prepended one at a time, so the batch ends up reversed.
        assert_eq!(entries[0].name, "c");
        assert_eq!(entries[2].name, "a");
    }

    #[test]
    fn never_exceeds_capacity_on_batch_insert() {
        let mut log = HistoryLog::new(2);
        log.record(vec![entry("a"), entry("b"), entry("c")]);
        assert_eq!(log.len(), 2);
    }
}
