//! State trait and the fixed, ordered set of states a walker can occupy.
//!
//! A Markov walk has no terminal states: every state is a place the walker
//! can be in and leave again. The set itself is fixed at construction and
//! its order is the order used when sampling the next state.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use thiserror::Error;

/// Trait for the states of a Markov walk.
///
/// All methods are pure. States are small immutable values describing where
/// the walker currently is.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history and snapshots
/// - `PartialEq`: states are resolved to their position in a [`StateSet`]
/// - `Debug`: states show up in log lines
/// - `Serialize` + `Deserialize`: snapshots are handed to presentation layers
///
/// # Example
///
/// ```rust
/// use markov_walk::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Weather {
///     Sunny,
///     Rainy,
/// }
///
/// impl State for Weather {
///     fn name(&self) -> &str {
///         match self {
///             Self::Sunny => "Sunny",
///             Self::Rainy => "Rainy",
///         }
///     }
/// }
///
/// assert_eq!(Weather::Rainy.name(), "Rainy");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// A state identified by a runtime label.
///
/// Useful when the set of states comes from configuration rather than
/// from a Rust enum.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl State for Label {
    fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed, ordered, non-empty set of distinct states.
///
/// Construction goes through [`StateSet::new`], which rejects empty input
/// and duplicates. Deserialization goes through it too. Indices handed out
/// by [`StateSet::index_of`] stay valid for the lifetime of the set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", try_from = "StateSetRepr<S>")]
pub struct StateSet<S: State> {
    states: Vec<S>,
}

/// Wire form of a [`StateSet`] before its checks have run.
#[derive(Deserialize)]
#[serde(bound = "")]
struct StateSetRepr<S: State> {
    states: Vec<S>,
}

impl<S: State> TryFrom<StateSetRepr<S>> for StateSet<S> {
    type Error = StateSetError;

    fn try_from(repr: StateSetRepr<S>) -> Result<Self, Self::Error> {
        Self::new(repr.states)
    }
}

/// Reason a list of states could not form a [`StateSet`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StateSetError {
    #[error("A state set needs at least one state")]
    Empty,

    #[error("State '{0}' appears more than once")]
    Duplicate(String),
}

impl<S: State> StateSet<S> {
    /// Build a set from states in sampling order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use markov_walk::core::{Label, StateSet};
    ///
    /// let set = StateSet::new(vec![Label::new("A"), Label::new("B")]).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.index_of(&Label::new("B")), Some(1));
    /// assert!(StateSet::<Label>::new(vec![]).is_err());
    /// ```
    pub fn new(states: Vec<S>) -> Result<Self, StateSetError> {
        if states.is_empty() {
            return Err(StateSetError::Empty);
        }
        for (i, state) in states.iter().enumerate() {
            if states[..i].contains(state) {
                return Err(StateSetError::Duplicate(state.name().to_string()));
            }
        }
        Ok(Self { states })
    }

    /// Position of `state` in sampling order.
    pub fn index_of(&self, state: &S) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.states.get(index)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.index_of(state).is_some()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: every constructor rejects an empty set.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Last state in sampling order, the fallback destination.
    pub fn last(&self) -> &S {
        // non-empty by construction
        &self.states[self.states.len() - 1]
    }

    pub fn last_index(&self) -> usize {
        self.states.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }

    pub fn as_slice(&self) -> &[S] {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Home,
        Park,
        School,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Home => "Home",
                Self::Park => "Park",
                Self::School => "School",
            }
        }
    }

    fn three() -> StateSet<TestState> {
        StateSet::new(vec![TestState::Home, TestState::Park, TestState::School]).unwrap()
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Home.name(), "Home");
        assert_eq!(TestState::Park.name(), "Park");
        assert_eq!(TestState::School.name(), "School");
    }

    #[test]
    fn set_preserves_order() {
        let set = three();
        assert_eq!(set.index_of(&TestState::Home), Some(0));
        assert_eq!(set.index_of(&TestState::Park), Some(1));
        assert_eq!(set.index_of(&TestState::School), Some(2));
        assert_eq!(set.last(), &TestState::School);
        assert_eq!(set.last_index(), 2);
    }

    #[test]
    fn set_rejects_empty() {
        assert_eq!(
            StateSet::<TestState>::new(Vec::new()),
            Err(StateSetError::Empty)
        );
    }

    #[test]
    fn set_rejects_duplicates() {
        let result = StateSet::new(vec![TestState::Home, TestState::Park, TestState::Home]);
        assert_eq!(result, Err(StateSetError::Duplicate("Home".to_string())));
    }

    #[test]
    fn label_uses_its_text_as_name() {
        let label = Label::from("Kitchen");
        assert_eq!(label.name(), "Kitchen");
        assert_eq!(label.to_string(), "Kitchen");
    }

    #[test]
    fn label_serializes_as_plain_string() {
        let json = serde_json::to_string(&Label::new("Park")).unwrap();
        assert_eq!(json, "\"Park\"");
        let back: Label = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Label::new("Park"));
    }

    #[test]
    fn deserializing_rejects_empty_set() {
        let result: Result<StateSet<Label>, _> = serde_json::from_str(r#"{"states":[]}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("at least one state"), "{err}");
    }

    #[test]
    fn deserializing_rejects_duplicates() {
        let result: Result<StateSet<Label>, _> =
            serde_json::from_str(r#"{"states":["A","B","A"]}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("'A' appears more than once"), "{err}");
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            StateSetError::Duplicate("Park".to_string()).to_string(),
            "State 'Park' appears more than once"
        );
    }

    #[test]
    fn set_serializes_correctly() {
        let set = three();
        let json = serde_json::to_string(&set).unwrap();
        let deserialized: StateSet<TestState> = serde_json::from_str(&json).unwrap();
        assert_eq!(set, deserialized);
    }
}
