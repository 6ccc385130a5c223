//! Per-state visit counters.
//!
//! Counters are never evicted: they keep growing for the whole session
//! while the history only keeps its most recent entries.

use serde::{Deserialize, Serialize};

/// Visit counters indexed by state position in a `StateSet`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitCounts {
    counts: Vec<u64>,
}

impl VisitCounts {
    /// Counters for `len` states with the initial state already visited once.
    pub fn seeded(len: usize, initial: usize) -> Self {
        let mut counts = vec![0; len];
        if let Some(slot) = counts.get_mut(initial) {
            *slot = 1;
        }
        Self { counts }
    }

    pub fn increment(&mut self, index: usize) {
        if let Some(slot) = self.counts.get_mut(index) {
            *slot += 1;
        }
    }

    pub fn get(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of transitions taken; the seeded visit is not a move.
    pub fn total_moves(&self) -> u64 {
        self.total().saturating_sub(1)
    }

    /// Percentage of all visits that landed on `index`.
    pub fn share(&self, index: usize) -> f64 {
        let total = self.total();
        match self.get(index) {
            Some(count) if total > 0 => count as f64 * 100.0 / total as f64,
            _ => 0.0,
        }
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_counts_initial_once() {
        let counts = VisitCounts::seeded(3, 0);
        assert_eq!(counts.as_slice(), &[1, 0, 0]);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.total_moves(), 0);
    }

    #[test]
    fn increment_accumulates() {
        let mut counts = VisitCounts::seeded(3, 1);
        counts.increment(2);
        counts.increment(2);
        counts.increment(0);
        assert_eq!(counts.as_slice(), &[1, 1, 2]);
        assert_eq!(counts.total_moves(), 3);
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut counts = VisitCounts::seeded(2, 0);
        counts.increment(7);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.get(7), None);
    }

    #[test]
    fn share_is_percentage_of_total() {
        let mut counts = VisitCounts::seeded(2, 0);
        counts.increment(1);
        counts.increment(1);
        counts.increment(1);
        assert!((counts.share(0) - 25.0).abs() < f64::EPSILON);
        assert!((counts.share(1) - 75.0).abs() < f64::EPSILON);
        assert_eq!(counts.share(5), 0.0);
    }
}
