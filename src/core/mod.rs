//! Core types of a Markov walk.
//!
//! This module contains the pure pieces the controller is built from:
//! - State definitions via the `State` trait and the ordered `StateSet`
//! - Bounded, immutable history of visited states
//! - Visit counters
//! - Draws and injectable draw sources
//!
//! Nothing in here sleeps, spawns or publishes.

mod draw;
mod history;
mod state;
mod visits;

pub use draw::{Draw, DrawSource, ScriptedDraws, SeededDraws, DRAW_MAX, DRAW_MIN};
pub use history::{BoundedHistory, HistoryError, DEFAULT_HISTORY_CAPACITY};
pub use state::{Label, State, StateSet, StateSetError};
pub use visits::VisitCounts;
