//! Weighted transition matrix over a fixed state set.

use crate::core::{Draw, State, StateSet};
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Smallest allowed weight.
pub const WEIGHT_MIN: u8 = 0;
/// Largest allowed weight.
pub const WEIGHT_MAX: u8 = 100;

/// Expected sum of a well-formed row.
const ROW_TARGET: u32 = 100;

/// A row whose weights do not add up to 100.
///
/// This is informational: the matrix keeps sampling from such rows.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("Row '{state}' sums to {sum}%, expected 100%")]
pub struct RowWarning {
    pub state: String,
    pub sum: u32,
}

/// Stored weights that do not cover every ordered pair of states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Expected {expected} weights for {states} states, found {found}")]
pub struct WeightCountError {
    pub states: usize,
    pub expected: usize,
    pub found: usize,
}

/// Integer percentage weights for every ordered pair of states.
///
/// Rows are intended to sum to 100 but are never normalized. Every stored
/// weight is kept within `[0, 100]`, including weights read back through
/// serde, which are clamped the same way [`TransitionMatrix::set_weight`]
/// clamps.
///
/// # Example
///
/// ```rust
/// use markov_walk::core::{Draw, Label, StateSet};
/// use markov_walk::model::TransitionMatrix;
///
/// let states = StateSet::new(vec![Label::new("A"), Label::new("B"), Label::new("C")]).unwrap();
/// let mut matrix = TransitionMatrix::new(states);
/// let a = Label::new("A");
/// matrix.set_weight(&a, &Label::new("A"), 30).unwrap();
/// matrix.set_weight(&a, &Label::new("B"), 50).unwrap();
/// matrix.set_weight(&a, &Label::new("C"), 20).unwrap();
///
/// let next = matrix.sample_next(&a, Draw::new(31).unwrap()).unwrap();
/// assert_eq!(next, &Label::new("B"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", try_from = "MatrixRepr<S>")]
pub struct TransitionMatrix<S: State> {
    states: StateSet<S>,
    /// Row-major, `states.len()` squared entries.
    weights: Vec<u8>,
}

#[derive(Deserialize)]
#[serde(bound = "")]
struct MatrixRepr<S: State> {
    states: StateSet<S>,
    weights: Vec<i64>,
}

impl<S: State> TryFrom<MatrixRepr<S>> for TransitionMatrix<S> {
    type Error = WeightCountError;

    fn try_from(repr: MatrixRepr<S>) -> Result<Self, Self::Error> {
        let n = repr.states.len();
        if repr.weights.len() != n * n {
            return Err(WeightCountError {
                states: n,
                expected: n * n,
                found: repr.weights.len(),
            });
        }
        Ok(Self {
            states: repr.states,
            weights: repr.weights.into_iter().map(clamp_weight).collect(),
        })
    }
}

impl<S: State> TransitionMatrix<S> {
    /// All-zero matrix over `states`.
    pub fn new(states: StateSet<S>) -> Self {
        let n = states.len();
        Self {
            states,
            weights: vec![WEIGHT_MIN; n * n],
        }
    }

    /// Matrix from explicit rows in state order.
    ///
    /// Missing entries are zero, extra entries are dropped, and values are
    /// clamped into `[0, 100]`.
    pub fn from_rows(states: StateSet<S>, rows: &[Vec<i64>]) -> Self {
        let mut matrix = Self::new(states);
        let n = matrix.states.len();
        for (from, row) in rows.iter().take(n).enumerate() {
            for (to, value) in row.iter().take(n).enumerate() {
                matrix.weights[from * n + to] = clamp_weight(*value);
            }
        }
        matrix
    }

    pub fn states(&self) -> &StateSet<S> {
        &self.states
    }

    /// Current weight of `from -> to`.
    pub fn weight(&self, from: &S, to: &S) -> Result<u8, SimulationError> {
        let (from, to) = (self.resolve(from)?, self.resolve(to)?);
        Ok(self.weight_at(from, to))
    }

    /// Set the weight of `from -> to`, clamped into `[0, 100]`.
    ///
    /// Other weights in the row are left as they are. Returns the value
    /// actually stored.
    pub fn set_weight(&mut self, from: &S, to: &S, value: i64) -> Result<u8, SimulationError> {
        let (from, to) = (self.resolve(from)?, self.resolve(to)?);
        Ok(self.set_weight_at(from, to, value))
    }

    /// Weights leaving `from`, in state order.
    pub fn row(&self, from: &S) -> Result<&[u8], SimulationError> {
        let from = self.resolve(from)?;
        Ok(self.row_at(from))
    }

    /// Sum of the weights leaving `from`.
    pub fn row_sum(&self, from: &S) -> Result<u32, SimulationError> {
        let from = self.resolve(from)?;
        Ok(self.row_sum_at(from))
    }

    /// Row sums in state order.
    pub fn row_sums(&self) -> Vec<u32> {
        (0..self.states.len()).map(|i| self.row_sum_at(i)).collect()
    }

    /// Next state for a walker at `from` given `draw`.
    ///
    /// See [`TransitionMatrix::sample_next_index`] for the selection rule.
    pub fn sample_next(&self, from: &S, draw: Draw) -> Result<&S, SimulationError> {
        let from = self.resolve(from)?;
        let next = self.sample_next_index(from, draw);
        Ok(self.states.get(next).unwrap_or_else(|| self.states.last()))
    }

    /// Index-level selection.
    ///
    /// Walks destinations in state order keeping a running sum of weights
    /// and returns the first destination whose running sum reaches `draw`.
    /// When the row sums to less than `draw` no destination qualifies and
    /// the last state in order is returned. An out-of-range `from` is
    /// treated the same way.
    pub fn sample_next_index(&self, from: usize, draw: Draw) -> usize {
        let target = draw.value() as u32;
        let mut cumulative = 0u32;
        if from < self.states.len() {
            for (to, weight) in self.row_at(from).iter().enumerate() {
                cumulative += *weight as u32;
                if cumulative >= target {
                    return to;
                }
            }
        }
        self.states.last_index()
    }

    /// True when `draw` cannot be matched by the row and sampling falls back
    /// to the last state.
    pub fn falls_back(&self, from: usize, draw: Draw) -> bool {
        from >= self.states.len() || self.row_sum_at(from) < draw.value() as u32
    }

    /// Check every row, accumulating a warning for each one that does not
    /// sum to 100.
    pub fn validate_rows(&self) -> Validation<(), NonEmptyVec<RowWarning>> {
        let checks: Vec<Validation<(), NonEmptyVec<RowWarning>>> = self
            .states
            .iter()
            .enumerate()
            .map(|(i, state)| {
                let sum = self.row_sum_at(i);
                if sum == ROW_TARGET {
                    Validation::success(())
                } else {
                    Validation::fail(RowWarning {
                        state: state.name().to_string(),
                        sum,
                    })
                }
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Rows that do not sum to 100, in state order.
    pub fn misconfigured_rows(&self) -> Vec<RowWarning> {
        match self.validate_rows() {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(warnings) => warnings.iter().cloned().collect(),
        }
    }

    pub(crate) fn resolve(&self, state: &S) -> Result<usize, SimulationError> {
        self.states
            .index_of(state)
            .ok_or_else(|| SimulationError::unknown(state.name()))
    }

    pub(crate) fn set_weight_at(&mut self, from: usize, to: usize, value: i64) -> u8 {
        let stored = clamp_weight(value);
        let n = self.states.len();
        self.weights[from * n + to] = stored;
        stored
    }

    pub(crate) fn weight_at(&self, from: usize, to: usize) -> u8 {
        let n = self.states.len();
        self.weights[from * n + to]
    }

    fn row_at(&self, from: usize) -> &[u8] {
        let n = self.states.len();
        &self.weights[from * n..(from + 1) * n]
    }

    fn row_sum_at(&self, from: usize) -> u32 {
        self.row_at(from).iter().map(|w| *w as u32).sum()
    }
}

fn clamp_weight(value: i64) -> u8 {
    value.clamp(WEIGHT_MIN as i64, WEIGHT_MAX as i64) as u8
}
