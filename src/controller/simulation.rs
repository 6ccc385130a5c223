//! The simulation handle: owns the walker, drives steps and publishes
//! updates.

use super::auto::AutoAdvance;
use super::snapshot::{Phase, Snapshot, StepOutcome, Update, UpdateKind};
use crate::config::SimulationConfig;
use crate::core::{
    BoundedHistory, Draw, DrawSource, State, StateSet, VisitCounts, DRAW_MAX, DRAW_MIN,
};
use crate::error::SimulationError;
use crate::model::TransitionMatrix;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Capacity of the update channel; slow subscribers skip older updates.
const UPDATE_CAPACITY: usize = 256;

/// A running Markov walk.
///
/// The handle is cheap to clone and every clone drives the same walker.
/// All mutation happens under a single lock that is never held across an
/// `.await`, so readers always observe a consistent snapshot.
///
/// # Example
///
/// ```
/// use markov_walk::builder::SimulationBuilder;
/// use markov_walk::config::{RollTiming, SimulationConfig};
/// use markov_walk::core::{Label, ScriptedDraws};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let (a, b) = (Label::new("A"), Label::new("B"));
/// let simulation = SimulationBuilder::new()
///     .states(vec![a.clone(), b.clone()])
///     .initial(a.clone())
///     .row(a.clone(), [(a.clone(), 40), (b.clone(), 60)])
///     .config(SimulationConfig { roll: RollTiming::instant(), ..Default::default() })
///     .draws(ScriptedDraws::new([75]))
///     .build()
///     .unwrap();
///
/// let outcome = simulation.step().await.unwrap();
/// assert_eq!(outcome.to, b);
/// assert_eq!(simulation.history().to_vec(), vec![a, b]);
/// # });
/// ```
pub struct Simulation<S: State> {
    inner: Arc<Inner<S>>,
}

impl<S: State> Clone for Simulation<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

pub(crate) struct Inner<S: State> {
    session: Uuid,
    initial: usize,
    config: SimulationConfig,
    core: Mutex<Core<S>>,
    updates: broadcast::Sender<Update<S>>,
}

/// Everything guarded by the simulation lock.
struct Core<S: State> {
    matrix: TransitionMatrix<S>,
    current: usize,
    history: BoundedHistory<S>,
    visits: VisitCounts,
    last_roll: Option<Draw>,
    rolling_face: Option<u8>,
    rolling: bool,
    stepping: bool,
    /// Bumped by `reset` so an in-flight step can tell its result is stale.
    generation: u64,
    auto: AutoAdvance,
    draws: Box<dyn DrawSource>,
    updated_at: DateTime<Utc>,
}

impl<S: State> Core<S> {
    fn state_at(&self, index: usize) -> &S {
        let states = self.matrix.states();
        states.get(index).unwrap_or_else(|| states.last())
    }

    fn snapshot(&self, session: Uuid) -> Snapshot<S> {
        Snapshot {
            session,
            states: self.matrix.states().clone(),
            current: self.state_at(self.current).clone(),
            history: self.history.clone(),
            visits: self.visits.clone(),
            last_roll: self.last_roll,
            rolling_face: self.rolling_face,
            is_rolling: self.rolling,
            is_stepping: self.stepping,
            is_auto_advancing: self.auto.enabled,
            interval: self.auto.interval,
            row_sums: self.matrix.row_sums(),
            updated_at: self.updated_at,
        }
    }

    fn restore(&mut self, initial: usize, history_capacity: usize) {
        let initial_state = self.state_at(initial).clone();
        self.current = initial;
        self.history = BoundedHistory::seeded(initial_state, history_capacity);
        self.visits = VisitCounts::seeded(self.matrix.states().len(), initial);
        self.last_roll = None;
        self.rolling_face = None;
        self.rolling = false;
    }
}

impl<S: State> Simulation<S> {
    pub(crate) fn new(
        matrix: TransitionMatrix<S>,
        initial: usize,
        config: SimulationConfig,
        draws: Box<dyn DrawSource>,
    ) -> Self {
        let initial_state = matrix
            .states()
            .get(initial)
            .unwrap_or_else(|| matrix.states().last())
            .clone();
        let visits = VisitCounts::seeded(matrix.states().len(), initial);
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);

        let core = Core {
            current: initial,
            history: BoundedHistory::seeded(initial_state, config.history_capacity),
            visits,
            last_roll: None,
            rolling_face: None,
            rolling: false,
            stepping: false,
            generation: 0,
            auto: AutoAdvance::new(config.interval.default_interval()),
            draws,
            updated_at: Utc::now(),
            matrix,
        };

        Self {
            inner: Arc::new(Inner {
                session: Uuid::new_v4(),
                initial,
                config,
                core: Mutex::new(core),
                updates,
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<Inner<S>>) -> Self {
        Self { inner }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Advance the walker by one transition.
    ///
    /// Returns `None` without touching anything when another step is still
    /// in flight. Otherwise plays the rolling phase, draws, moves the walker
    /// and returns what happened. If the simulation is reset while this
    /// step is in flight the move is discarded and `None` is returned.
    pub async fn step(&self) -> Option<StepOutcome<S>> {
        let generation = {
            let mut core = self.inner.core.lock();
            if core.stepping {
                debug!(
                    "[{}] step ignored: another step is in flight",
                    self.inner.session
                );
                return None;
            }
            core.stepping = true;
            core.rolling = true;
            core.rolling_face = None;
            self.publish(&mut core, UpdateKind::RollStarted);
            core.generation
        };
        // clears `stepping` however this future ends, including cancellation
        let _guard = StepGuard {
            simulation: self,
            generation,
        };

        let timing = self.inner.config.roll;
        for _ in 0..timing.frames {
            let face = rand::thread_rng().gen_range(DRAW_MIN..=DRAW_MAX);
            {
                let mut core = self.inner.core.lock();
                if core.generation == generation {
                    core.rolling_face = Some(face);
                    self.publish(&mut core, UpdateKind::RollFace(face));
                }
            }
            pause(timing.frame_delay()).await;
        }

        let (from, to, draw) = {
            let mut core = self.inner.core.lock();
            if core.generation != generation {
                debug!(
                    "[{}] step discarded before its draw: simulation was reset",
                    self.inner.session
                );
                return None;
            }
            let draw = core.draws.draw();
            let from = core.current;
            let to = core.matrix.sample_next_index(from, draw);
            if core.matrix.falls_back(from, draw) {
                warn!(
                    "[{}] row '{}' cannot reach draw {}, falling back to '{}'",
                    self.inner.session,
                    core.state_at(from).name(),
                    draw,
                    core.state_at(to).name()
                );
            }
            core.last_roll = Some(draw);
            core.rolling_face = Some(draw.value());
            self.publish(&mut core, UpdateKind::RollFace(draw.value()));
            (from, to, draw)
        };

        pause(timing.reveal_delay()).await;

        let outcome = {
            let mut core = self.inner.core.lock();
            if core.generation != generation {
                debug!(
                    "[{}] step discarded: simulation was reset mid-step",
                    self.inner.session
                );
                None
            } else {
                let outcome = StepOutcome {
                    from: core.state_at(from).clone(),
                    to: core.state_at(to).clone(),
                    draw,
                    at: Utc::now(),
                };
                core.history = core.history.record(outcome.to.clone());
                core.visits.increment(to);
                core.current = to;
                debug!(
                    "[{}] {} -> {} (draw {})",
                    self.inner.session,
                    outcome.from.name(),
                    outcome.to.name(),
                    draw
                );
                self.publish(&mut core, UpdateKind::Stepped(outcome.clone()));
                Some(outcome)
            }
        };

        pause(timing.settle_delay()).await;
        outcome
    }

    /// Return to the initial state and stop auto-advance.
    ///
    /// History and visit counts are reseeded; the matrix is untouched.
    pub fn reset(&self) {
        let mut core = self.inner.core.lock();
        core.auto.stop();
        core.generation = core.generation.wrapping_add(1);
        core.restore(self.inner.initial, self.inner.config.history_capacity);
        info!("[{}] reset to initial state", self.inner.session);
        self.publish(&mut core, UpdateKind::Reset);
    }

    /// Set the weight of `from -> to`, clamped into `[0, 100]`.
    pub fn set_weight(&self, from: &S, to: &S, value: i64) -> Result<u8, SimulationError> {
        let mut core = self.inner.core.lock();
        let weight = core.matrix.set_weight(from, to, value)?;
        self.publish(
            &mut core,
            UpdateKind::WeightChanged {
                from: from.clone(),
                to: to.clone(),
                weight,
            },
        );
        Ok(weight)
    }

    /// Turn the auto-advance timer on or off.
    ///
    /// Turning it on needs a Tokio runtime. Turning it off stops future
    /// ticks immediately; a step already in flight completes.
    pub fn set_auto_advance(&self, enabled: bool) -> Result<(), SimulationError> {
        let mut core = self.inner.core.lock();
        if core.auto.enabled == enabled {
            return Ok(());
        }
        if enabled {
            let interval = core.auto.interval;
            core.auto.start(&self.inner, interval)?;
        } else {
            core.auto.stop();
        }
        info!(
            "[{}] auto-advance {} (every {:?})",
            self.inner.session,
            if enabled { "on" } else { "off" },
            core.auto.interval
        );
        self.publish(&mut core, UpdateKind::AutoAdvanceChanged { enabled });
        Ok(())
    }

    /// Change the auto-advance period.
    ///
    /// The request is clamped into the configured range and snapped to its
    /// granularity; the applied value is returned. A running timer picks the
    /// new period up without being toggled. If the timer cannot be restarted
    /// the old period stays in effect.
    pub fn set_interval(&self, interval: Duration) -> Result<Duration, SimulationError> {
        let applied = self.inner.config.interval.fit(interval);
        let mut core = self.inner.core.lock();
        if core.auto.interval == applied {
            return Ok(applied);
        }
        if core.auto.enabled {
            core.auto.start(&self.inner, applied)?;
        } else {
            core.auto.interval = applied;
        }
        debug!("[{}] interval set to {:?}", self.inner.session, applied);
        self.publish(&mut core, UpdateKind::IntervalChanged { interval: applied });
        Ok(applied)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn snapshot(&self) -> Snapshot<S> {
        self.inner.core.lock().snapshot(self.inner.session)
    }

    /// Receive an [`Update`] after every mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<Update<S>> {
        self.inner.updates.subscribe()
    }

    pub fn session(&self) -> Uuid {
        self.inner.session
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.inner.config
    }

    pub fn states(&self) -> StateSet<S> {
        self.inner.core.lock().matrix.states().clone()
    }

    pub fn current_state(&self) -> S {
        let core = self.inner.core.lock();
        core.state_at(core.current).clone()
    }

    pub fn history(&self) -> BoundedHistory<S> {
        self.inner.core.lock().history.clone()
    }

    pub fn visit_counts(&self) -> VisitCounts {
        self.inner.core.lock().visits.clone()
    }

    pub fn last_roll(&self) -> Option<Draw> {
        self.inner.core.lock().last_roll
    }

    pub fn is_rolling(&self) -> bool {
        self.inner.core.lock().rolling
    }

    pub fn is_stepping(&self) -> bool {
        self.inner.core.lock().stepping
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.inner.core.lock().auto.enabled
    }

    pub fn interval(&self) -> Duration {
        self.inner.core.lock().auto.interval
    }

    pub fn phase(&self) -> Phase {
        let core = self.inner.core.lock();
        Phase::derive(core.stepping, core.auto.enabled)
    }

    pub fn weight(&self, from: &S, to: &S) -> Result<u8, SimulationError> {
        self.inner.core.lock().matrix.weight(from, to)
    }

    pub fn row_sum(&self, from: &S) -> Result<u32, SimulationError> {
        self.inner.core.lock().matrix.row_sum(from)
    }

    /// Copy of the current transition matrix.
    pub fn matrix(&self) -> TransitionMatrix<S> {
        self.inner.core.lock().matrix.clone()
    }

    pub(crate) fn ready_for_tick(&self) -> bool {
        let core = self.inner.core.lock();
        core.auto.enabled && !core.stepping
    }

    fn publish(&self, core: &mut Core<S>, kind: UpdateKind<S>) {
        core.updated_at = Utc::now();
        let snapshot = Arc::new(core.snapshot(self.inner.session));
        // no subscribers is fine
        let _ = self.inner.updates.send(Update { kind, snapshot });
    }
}

/// Ends a step: clears the in-flight flag and, unless a reset already did,
/// the rolling display.
struct StepGuard<'a, S: State> {
    simulation: &'a Simulation<S>,
    generation: u64,
}

impl<S: State> Drop for StepGuard<'_, S> {
    fn drop(&mut self) {
        let mut core = self.simulation.inner.core.lock();
        core.stepping = false;
        if core.generation == self.generation {
            core.rolling = false;
        }
        self.simulation.publish(&mut core, UpdateKind::RollFinished);
    }
}

/// Sleep for `delay`, or just yield to the scheduler when it is zero.
async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}
