//! Markov Walk: a finite-state Markov chain you can watch.
//!
//! A walker occupies one of a fixed set of states and moves between them
//! according to per-state percentage weights. The crate follows a "pure
//! core, async shell" split:
//!
//! - **core** / **model**: states, bounded history, visit counters, draws and
//!   the transition matrix. Sampling is a pure function of a draw in
//!   `[1, 100]`, so it can be tested with fixed draws.
//! - **controller**: the [`Simulation`] handle. It guards against
//!   overlapping steps, runs the optional auto-advance timer and publishes
//!   a snapshot after every mutation.
//!
//! # Example
//!
//! ```rust
//! use markov_walk::config::{RollTiming, SimulationConfig};
//! use markov_walk::core::ScriptedDraws;
//! use markov_walk::presets::{village_walk, Place};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let simulation = village_walk()
//!     .config(SimulationConfig { roll: RollTiming::instant(), ..Default::default() })
//!     .draws(ScriptedDraws::new([15, 81]))
//!     .build()
//!     .unwrap();
//!
//! simulation.step().await; // 15 -> Home
//! simulation.step().await; // 81 from Home -> School
//!
//! let snapshot = simulation.snapshot();
//! assert_eq!(snapshot.current, Place::School);
//! assert_eq!(snapshot.history.to_vec(), vec![Place::Home, Place::Home, Place::School]);
//! assert_eq!(snapshot.total_moves(), 2);
//! # });
//! ```

pub mod builder;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod model;
pub mod presets;

// Re-export commonly used types
pub use builder::{BuildError, SimulationBuilder};
pub use config::SimulationConfig;
pub use controller::{Phase, Simulation, Snapshot, StepOutcome, Update, UpdateKind};
pub use core::{Draw, DrawSource, Label, State};
pub use error::SimulationError;
pub use model::TransitionMatrix;
