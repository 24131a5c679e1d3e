//! Per-conversation request generations.
//!
//! Every new request bumps its conversation's generation. A result computed
//! for an older generation is stale and must not be committed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

/// Monotonic generation counters keyed by conversation id.
#[derive(Debug, Default)]
pub struct GenerationTracker {
    counters: DashMap<String, Arc<AtomicU64>>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, conversation_id: &str) -> Arc<AtomicU64> {
        if let Some(c) = self.counters.get(conversation_id) {
            return c.clone();
        }
        self.counters
            .entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone()
    }

    /// Start a new request for `conversation_id`, returning its generation.
    pub fn begin(&self, conversation_id: &str) -> u64 {
        self.counter(conversation_id).fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Latest generation issued for `conversation_id` (0 if none).
    pub fn current(&self, conversation_id: &str) -> u64 {
        self.counters
            .get(conversation_id)
            .map(|c| c.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Whether `generation` is still the newest request of its conversation.
    ///
    /// A forgotten conversation has no newer request, so anything issued for
    /// it still counts as current.
    pub fn is_current(&self, conversation_id: &str, generation: u64) -> bool {
        self.counters
            .get(conversation_id)
            .map_or(true, |c| c.load(Ordering::Acquire) == generation)
    }

    pub fn forget(&self, conversation_id: &str) {
        self.counters.remove(conversation_id);
    }

    /// Drop every counter whose conversation fails `keep`. Returns how many
    /// were dropped.
    pub fn retain(&self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.counters.len();
        self.counters.retain(|id, _| keep(id));
        before.saturating_sub(self.counters.len())
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_increase_per_conversation() {
        let tracker = GenerationTracker::new();
        assert_eq!(tracker.begin("a"), 1);
        assert_eq!(tracker.begin("a"), 2);
        assert_eq!(tracker.begin("b"), 1);
        assert_eq!(tracker.current("a"), 2);
        assert_eq!(tracker.current("missing"), 0);
    }

    #[test]
    fn older_generation_is_superseded() {
        let tracker = GenerationTracker::new();
        let first = tracker.begin("a");
        let second = tracker.begin("a");
        assert!(!tracker.is_current("a", first));
        assert!(tracker.is_current("a", second));
    }

    #[test]
    fn forgotten_conversation_does_not_supersede() {
        let tracker = GenerationTracker::new();
        let generation = tracker.begin("a");
        tracker.forget("a");
        assert!(tracker.is_current("a", generation));
        assert!(tracker.is_empty());
    }

    #[test]
    fn retain_drops_unkept_counters() {
        let tracker = GenerationTracker::new();
        for id in ["a", "b", "c"] {
            tracker.begin(id);
        }
        assert_eq!(tracker.retain(|id| id == "b"), 2);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.current("b"), 1);
    }

    #[test]
    fn concurrent_begins_hand_out_unique_generations() {
        let tracker = Arc::new(GenerationTracker::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let t = tracker.clone();
            handles.push(std::thread::spawn(move || {
                (0..100).map(|_| t.begin("shared")).collect::<Vec<_>>()
            }));
        }
        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800);
        assert_eq!(tracker.current("shared"), 800);
    }
}
