//! Builder API for ergonomic simulation construction.
//!
//! This module provides a fluent builder and the `state_enum!` macro for
//! declaring walks with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod simulation;

pub use error::BuildError;
pub use simulation::SimulationBuilder;
