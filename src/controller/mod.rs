//! Simulation controller: the async shell around the pure model.
//!
//! - **Simulation**: owns the walker, guards against overlapping steps and
//!   publishes an [`Update`] after every mutation
//! - **Snapshots**: immutable, serializable copies for presentation layers
//! - **Auto-advance**: a Tokio timer that keeps stepping at a set interval

mod auto;
mod simulation;
mod snapshot;

pub use simulation::Simulation;
pub use snapshot::{Phase, Snapshot, StepOutcome, Update, UpdateKind};
