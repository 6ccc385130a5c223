//! Errors for the simulation builder.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur when building a simulation.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("No states defined. Call .states(..) with at least one state")]
    MissingStates,

    #[error("State '{name}' was listed more than once")]
    DuplicateState { name: String },

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("State '{name}' is not in the configured state set")]
    UnknownState { name: String },

    #[error("Invalid configuration ({} problem(s)): {}", .0.len(), join(.0))]
    InvalidConfig(Vec<ConfigError>),
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
