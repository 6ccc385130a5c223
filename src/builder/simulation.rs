//! Builder for constructing simulations.

use crate::builder::error::BuildError;
use crate::config::SimulationConfig;
use crate::controller::Simulation;
use crate::core::{DrawSource, SeededDraws, State, StateSet, StateSetError};
use crate::model::TransitionMatrix;
use stillwater::validation::Validation;

/// Builder for constructing simulations with a fluent API.
///
/// # Example
///
/// ```
/// use markov_walk::builder::SimulationBuilder;
/// use markov_walk::core::Label;
///
/// let (a, b) = (Label::new("A"), Label::new("B"));
/// let simulation = SimulationBuilder::new()
///     .states(vec![a.clone(), b.clone()])
///     .initial(a.clone())
///     .row(a.clone(), [(a.clone(), 50), (b.clone(), 50)])
///     .row(b.clone(), [(a.clone(), 100)])
///     .build()
///     .unwrap();
///
/// assert_eq!(simulation.current_state(), a);
/// ```
pub struct SimulationBuilder<S: State> {
    states: Vec<S>,
    initial: Option<S>,
    weights: Vec<(S, S, i64)>,
    config: SimulationConfig,
    draws: Option<Box<dyn DrawSource>>,
}

impl<S: State> SimulationBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            weights: Vec::new(),
            config: SimulationConfig::default(),
            draws: None,
        }
    }

    /// Set the states in sampling order (required).
    pub fn states(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set a single weight. Values are clamped into `[0, 100]`.
    pub fn weight(mut self, from: S, to: S, value: i64) -> Self {
        self.weights.push((from, to, value));
        self
    }

    /// Set several weights leaving `from`.
    pub fn row(mut self, from: S, weights: impl IntoIterator<Item = (S, i64)>) -> Self {
        for (to, value) in weights {
            self.weights.push((from.clone(), to, value));
        }
        self
    }

    /// Replace the default configuration.
    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject the source of draws.
    ///
    /// Defaults to [`SeededDraws`], seeded from the configuration when a
    /// seed is set.
    pub fn draws(mut self, draws: impl DrawSource + 'static) -> Self {
        self.draws = Some(Box::new(draws));
        self
    }

    /// Build the simulation.
    /// Returns an error if required fields are missing or invalid.
    pub fn build(self) -> Result<Simulation<S>, BuildError> {
        let states = StateSet::new(self.states).map_err(|e| match e {
            StateSetError::Empty => BuildError::MissingStates,
            StateSetError::Duplicate(name) => BuildError::DuplicateState { name },
        })?;

        if let Validation::Failure(errors) = self.config.validate() {
            return Err(BuildError::InvalidConfig(errors.iter().cloned().collect()));
        }

        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let initial = states
            .index_of(&initial)
            .ok_or_else(|| BuildError::UnknownState {
                name: initial.name().to_string(),
            })?;

        let unknown = |state: &S| BuildError::UnknownState {
            name: state.name().to_string(),
        };
        let mut matrix = TransitionMatrix::new(states);
        for (from, to, value) in &self.weights {
            let from = matrix.states().index_of(from).ok_or_else(|| unknown(from))?;
            let to = matrix.states().index_of(to).ok_or_else(|| unknown(to))?;
            matrix.set_weight_at(from, to, *value);
        }

        let draws = self.draws.unwrap_or_else(|| match self.config.seed {
            Some(seed) => Box::new(SeededDraws::new(seed)),
            None => Box::new(SeededDraws::from_entropy()),
        });

        Ok(Simulation::new(matrix, initial, self.config, draws))
    }
}

impl<S: State> Default for SimulationBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
