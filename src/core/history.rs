//! Bounded history of visited states.
//!
//! History is immutable: [`BoundedHistory::record`] returns a new history
//! with the state appended, evicting the oldest entry once the capacity is
//! reached.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Default number of states kept in a history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Most-recent-last sequence of visited states with a fixed capacity.
///
/// # Example
///
/// ```rust
/// use markov_walk::core::{BoundedHistory, Label};
///
/// let history = BoundedHistory::seeded(Label::new("A"), 2);
/// let history = history.record(Label::new("B"));
/// let history = history.record(Label::new("C"));
///
/// let path: Vec<&str> = history.iter().map(|s| s.as_str()).collect();
/// assert_eq!(path, vec!["B", "C"]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", try_from = "HistoryRepr<S>")]
pub struct BoundedHistory<S: State> {
    entries: VecDeque<S>,
    capacity: usize,
}

/// A stored history that breaks the capacity bound.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History capacity must be at least 1")]
    ZeroCapacity,

    #[error("History holds {len} entries but its capacity is {capacity}")]
    OverCapacity { len: usize, capacity: usize },
}

#[derive(Deserialize)]
#[serde(bound = "")]
struct HistoryRepr<S: State> {
    entries: VecDeque<S>,
    capacity: usize,
}

impl<S: State> TryFrom<HistoryRepr<S>> for BoundedHistory<S> {
    type Error = HistoryError;

    fn try_from(repr: HistoryRepr<S>) -> Result<Self, Self::Error> {
        if repr.capacity == 0 {
            return Err(HistoryError::ZeroCapacity);
        }
        if repr.entries.len() > repr.capacity {
            return Err(HistoryError::OverCapacity {
                len: repr.entries.len(),
                capacity: repr.capacity,
            });
        }
        Ok(Self {
            entries: repr.entries,
            capacity: repr.capacity,
        })
    }
}

impl<S: State> BoundedHistory<S> {
    /// History containing only `initial`.
    ///
    /// A capacity of zero is raised to one so the seed is always present.
    pub fn seeded(initial: S, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity);
        entries.push_back(initial);
        Self { entries, capacity }
    }

    /// Record a visit, returning a new history.
    ///
    /// `self` is left untouched.
    pub fn record(&self, state: S) -> Self {
        let mut entries = self.entries.clone();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(state);
        Self {
            entries,
            capacity: self.capacity,
        }
    }

    pub fn latest(&self) -> Option<&S> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&S> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.entries.iter()
    }

    /// Copy of the entries, oldest first.
    pub fn to_vec(&self) -> Vec<S> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Label;

    fn l(name: &str) -> Label {
        Label::new(name)
    }

    #[test]
    fn seeded_history_holds_initial() {
        let history = BoundedHistory::seeded(l("A"), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest(), Some(&l("A")));
        assert_eq!(history.capacity(), 20);
    }

    #[test]
    fn record_is_immutable() {
        let history = BoundedHistory::seeded(l("A"), 5);
        let new_history = history.record(l("B"));

        assert_eq!(history.len(), 1);
        assert_eq!(new_history.len(), 2);
        assert_eq!(new_history.latest(), Some(&l("B")));
    }

    #[test]
    fn record_evicts_oldest_at_capacity() {
        let mut history = BoundedHistory::seeded(l("0"), 3);
        for name in ["1", "2", "3", "4"] {
            history = history.record(l(name));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.to_vec(), vec![l("2"), l("3"), l("4")]);
        assert_eq!(history.oldest(), Some(&l("2")));
    }

    #[test]
    fn zero_capacity_still_keeps_seed() {
        let history = BoundedHistory::seeded(l("A"), 0);
        assert_eq!(history.capacity(), 1);
        let history = history.record(l("B"));
        assert_eq!(history.to_vec(), vec![l("B")]);
    }

    #[test]
    fn history_serializes_correctly() {
        let history = BoundedHistory::seeded(l("A"), 4).record(l("B"));
        let json = serde_json::to_string(&history).unwrap();
        let deserialized: BoundedHistory<Label> = serde_json::from_str(&json).unwrap();
        assert_eq!(history, deserialized);
    }

    #[test]
    fn deserializing_rejects_broken_bounds() {
        let zero: Result<BoundedHistory<Label>, _> =
            serde_json::from_str(r#"{"entries":[],"capacity":0}"#);
        assert!(zero.unwrap_err().to_string().contains("at least 1"));

        let over: Result<BoundedHistory<Label>, _> =
            serde_json::from_str(r#"{"entries":["A","B","C"],"capacity":2}"#);
        assert!(over
            .unwrap_err()
            .to_string()
            .contains("holds 3 entries but its capacity is 2"));
    }
}
