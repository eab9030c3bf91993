//! Bounded ring of the last five human-readable state transitions for a
//! Stream, owned by its state-observer closure (§9). Grounded in the same
//! small lock-plus-`VecDeque` shape used elsewhere in this codebase for a
//! bounded recent-events log.

use std::collections::VecDeque;
use std::sync::Mutex;

const CAPACITY: usize = 5;

pub struct History {
    entries: Mutex<VecDeque<String>>,
}

impl History {
    pub fn new() -> Self {
        History {
            entries: Mutex::new(VecDeque::with_capacity(CAPACITY)),
        }
    }

    pub fn push(&self, entry: String) {
        let mut entries = self.entries.lock().expect("history lock poisoned");
        if entries.len() == CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("history lock poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for History {
    fn default() -> Self {
        History::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_most_recent_five_entries() {
        let h = History::new();
        for i in 0..8 {
            h.push(format!("entry-{i}"));
        }
        let snap = h.snapshot();
        assert_eq!(snap.len(), 5);
        assert_eq!(snap, vec!["entry-3", "entry-4", "entry-5", "entry-6", "entry-7"]);
    }

    #[test]
    fn empty_history_snapshots_to_empty_vec() {
        let h = History::new();
        assert!(h.snapshot().is_empty());
    }
}
