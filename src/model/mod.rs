//! Transition model: the weights between states and the sampling rule.
//!
//! The model is pure configuration plus a pure function of a draw. It
//! never generates randomness itself.

mod matrix;

pub use matrix::{RowWarning, TransitionMatrix, WeightCountError, WEIGHT_MAX, WEIGHT_MIN};
