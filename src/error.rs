//! Errors raised at the boundary of a running simulation.

use thiserror::Error;

/// Errors returned by simulation and matrix operations.
///
/// Out-of-range weights and intervals are clamped rather than reported, and
/// a step requested while another is in flight is silently ignored, so the
/// taxonomy stays small.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    #[error("State '{name}' is not part of this simulation")]
    UnknownState { name: String },

    #[error("Auto-advance needs a running Tokio runtime")]
    RuntimeUnavailable,
}

impl SimulationError {
    pub(crate) fn unknown(name: &str) -> Self {
        Self::UnknownState {
            name: name.to_string(),
        }
    }
}
