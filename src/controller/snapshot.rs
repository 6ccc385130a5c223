//! Immutable views of a simulation handed to presentation layers.

use crate::core::{BoundedHistory, Draw, State, StateSet, VisitCounts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Derived controller phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Stepping,
    AutoAdvancing,
}

impl Phase {
    pub(crate) fn derive(is_stepping: bool, is_auto_advancing: bool) -> Self {
        match (is_stepping, is_auto_advancing) {
            (true, _) => Self::Stepping,
            (false, true) => Self::AutoAdvancing,
            (false, false) => Self::Idle,
        }
    }
}

/// Record of one completed move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StepOutcome<S: State> {
    pub from: S,
    pub to: S,
    pub draw: Draw,
    pub at: DateTime<Utc>,
}

/// Consistent copy of everything an observer can read.
///
/// Built while the simulation's lock is held, so fields never mix values
/// from before and after a mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Snapshot<S: State> {
    pub session: Uuid,
    pub states: StateSet<S>,
    pub current: S,
    pub history: BoundedHistory<S>,
    pub visits: VisitCounts,
    /// Last real draw; `None` before the first step and after a reset.
    pub last_roll: Option<Draw>,
    /// Face currently shown by the rolling display, cosmetic faces included.
    pub rolling_face: Option<u8>,
    pub is_rolling: bool,
    pub is_stepping: bool,
    pub is_auto_advancing: bool,
    pub interval: Duration,
    pub row_sums: Vec<u32>,
    pub updated_at: DateTime<Utc>,
}

impl<S: State> Snapshot<S> {
    pub fn phase(&self) -> Phase {
        Phase::derive(self.is_stepping, self.is_auto_advancing)
    }

    /// Manual controls should be disabled while a step is in flight.
    pub fn controls_locked(&self) -> bool {
        self.is_stepping
    }

    pub fn can_step(&self) -> bool {
        !self.is_stepping
    }

    pub fn visit_count(&self, state: &S) -> Option<u64> {
        self.states
            .index_of(state)
            .and_then(|i| self.visits.get(i))
    }

    /// Percentage of visits that landed on `state`.
    pub fn visit_share(&self, state: &S) -> Option<f64> {
        self.states.index_of(state).map(|i| self.visits.share(i))
    }

    pub fn total_moves(&self) -> u64 {
        self.visits.total_moves()
    }

    pub fn row_sum(&self, state: &S) -> Option<u32> {
        self.states
            .index_of(state)
            .and_then(|i| self.row_sums.get(i).copied())
    }

    /// States whose outgoing weights do not sum to 100.
    pub fn misconfigured_rows(&self) -> Vec<&S> {
        self.states
            .iter()
            .zip(&self.row_sums)
            .filter(|(_, sum)| **sum != 100)
            .map(|(state, _)| state)
            .collect()
    }
}

/// What changed in a published [`Update`].
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateKind<S: State> {
    RollStarted,
    RollFace(u8),
    Stepped(StepOutcome<S>),
    RollFinished,
    Reset,
    WeightChanged { from: S, to: S, weight: u8 },
    AutoAdvanceChanged { enabled: bool },
    IntervalChanged { interval: Duration },
}

/// Notification published after every mutation.
#[derive(Clone, Debug)]
pub struct Update<S: State> {
    pub kind: UpdateKind<S>,
    pub snapshot: Arc<Snapshot<S>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Label;

    fn snapshot() -> Snapshot<Label> {
        let states =
            StateSet::new(vec![Label::new("A"), Label::new("B"), Label::new("C")]).unwrap();
        let mut visits = VisitCounts::seeded(3, 0);
        visits.increment(1);
        visits.increment(1);
        visits.increment(2);
        Snapshot {
            session: Uuid::new_v4(),
            states,
            current: Label::new("C"),
            history: BoundedHistory::seeded(Label::new("A"), 20),
            visits,
            last_roll: Draw::new(90),
            rolling_face: None,
            is_rolling: false,
            is_stepping: false,
            is_auto_advancing: true,
            interval: Duration::from_millis(1500),
            row_sums: vec![100, 90, 100],
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn phase_prefers_stepping() {
        assert_eq!(Phase::derive(false, false), Phase::Idle);
        assert_eq!(Phase::derive(true, false), Phase::Stepping);
        assert_eq!(Phase::derive(true, true), Phase::Stepping);
        assert_eq!(Phase::derive(false, true), Phase::AutoAdvancing);
    }

    #[test]
    fn projections_follow_flags() {
        let mut snap = snapshot();
        assert_eq!(snap.phase(), Phase::AutoAdvancing);
        assert!(snap.can_step());
        assert!(!snap.controls_locked());

        snap.is_stepping = true;
        assert_eq!(snap.phase(), Phase::Stepping);
        assert!(!snap.can_step());
        assert!(snap.controls_locked());
    }

    #[test]
    fn visit_statistics() {
        let snap = snapshot();
        assert_eq!(snap.visit_count(&Label::new("B")), Some(2));
        assert_eq!(snap.visit_count(&Label::new("Z")), None);
        assert_eq!(snap.total_moves(), 3);
        let share = snap.visit_share(&Label::new("B")).unwrap();
        assert!((share - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn misconfigured_rows_lists_states() {
        let snap = snapshot();
        assert_eq!(snap.misconfigured_rows(), vec![&Label::new("B")]);
        assert_eq!(snap.row_sum(&Label::new("B")), Some(90));
    }

    #[test]
    fn snapshot_serializes_correctly() {
        let snap = snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let deserialized: Snapshot<Label> = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, deserialized);
    }
}
