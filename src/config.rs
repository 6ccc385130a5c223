//! Tunable settings for a simulation.
//!
//! Settings are plain serde data so they can be loaded from JSON. Validation
//! accumulates every problem with Stillwater's `Validation` instead of
//! stopping at the first one.

use crate::core::DEFAULT_HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Problems found while validating a [`SimulationConfig`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("History capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error("Interval minimum ({min_ms} ms) is above its maximum ({max_ms} ms)")]
    InvertedIntervalRange { min_ms: u64, max_ms: u64 },

    #[error("Interval minimum must be above zero")]
    ZeroIntervalMinimum,

    #[error("Interval granularity must be above zero")]
    ZeroGranularity,

    #[error("Default interval {default_ms} ms is outside [{min_ms}, {max_ms}] ms")]
    DefaultIntervalOutOfRange {
        default_ms: u64,
        min_ms: u64,
        max_ms: u64,
    },

    #[error("Could not parse configuration: {0}")]
    Parse(String),
}

/// Inclusive bounds and granularity of the auto-advance interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalRange {
    pub min_ms: u64,
    pub max_ms: u64,
    pub granularity_ms: u64,
    pub default_ms: u64,
}

impl Default for IntervalRange {
    fn default() -> Self {
        Self {
            min_ms: 500,
            max_ms: 3000,
            granularity_ms: 100,
            default_ms: 1500,
        }
    }
}

impl IntervalRange {
    /// Clamp `requested` into the range and snap it to the granularity
    /// grid anchored at `min_ms`.
    ///
    /// ```rust
    /// use markov_walk::config::IntervalRange;
    /// use std::time::Duration;
    ///
    /// let range = IntervalRange::default();
    /// assert_eq!(range.fit(Duration::from_millis(120)), Duration::from_millis(500));
    /// assert_eq!(range.fit(Duration::from_millis(1234)), Duration::from_millis(1200));
    /// assert_eq!(range.fit(Duration::from_millis(1250)), Duration::from_millis(1300));
    /// assert_eq!(range.fit(Duration::from_secs(9)), Duration::from_millis(3000));
    /// ```
    pub fn fit(&self, requested: Duration) -> Duration {
        let requested = u64::try_from(requested.as_millis()).unwrap_or(u64::MAX);
        let clamped = requested.clamp(self.min_ms, self.max_ms.max(self.min_ms));
        let snapped = match self.granularity_ms {
            0 => clamped,
            g => {
                let offset = clamped - self.min_ms;
                let steps = (offset + g / 2) / g;
                self.min_ms + steps * g
            }
        };
        Duration::from_millis(snapped.min(self.max_ms.max(self.min_ms)))
    }

    pub fn default_interval(&self) -> Duration {
        self.fit(Duration::from_millis(self.default_ms))
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

/// Pacing of the cosmetic "rolling" phase of a step.
///
/// None of these delays affect which state is chosen; they only give an
/// observer time to watch the roll. [`RollTiming::instant`] removes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollTiming {
    /// Number of throwaway faces shown before the real draw.
    pub frames: u32,
    pub frame_delay_ms: u64,
    /// Pause after revealing the real draw, before moving the walker.
    pub reveal_delay_ms: u64,
    /// Pause after moving, before the step is considered finished.
    pub settle_delay_ms: u64,
}

impl Default for RollTiming {
    fn default() -> Self {
        Self {
            frames: 10,
            frame_delay_ms: 100,
            reveal_delay_ms: 500,
            settle_delay_ms: 500,
        }
    }
}

impl RollTiming {
    pub fn instant() -> Self {
        Self {
            frames: 0,
            frame_delay_ms: 0,
            reveal_delay_ms: 0,
            settle_delay_ms: 0,
        }
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Wall time of one full step.
    pub fn total(&self) -> Duration {
        self.frame_delay() * self.frames + self.reveal_delay() + self.settle_delay()
    }
}

/// Settings shared by every simulation regardless of its states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub history_capacity: usize,
    pub interval: IntervalRange,
    pub roll: RollTiming,
    /// Seed for the default draw source; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            interval: IntervalRange::default(),
            roll: RollTiming::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse from JSON. Missing fields take their defaults.
    ///
    /// ```rust
    /// use markov_walk::config::SimulationConfig;
    ///
    /// let config = SimulationConfig::from_json(r#"{ "history_capacity": 5, "seed": 3 }"#).unwrap();
    /// assert_eq!(config.history_capacity, 5);
    /// assert_eq!(config.interval.default_ms, 1500);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every setting, accumulating ALL problems.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigError>> {
        let interval = &self.interval;
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigError>>> = Vec::new();

        checks.push(if self.history_capacity == 0 {
            Validation::fail(ConfigError::ZeroHistoryCapacity)
        } else {
            Validation::success(())
        });

        checks.push(if interval.min_ms > interval.max_ms {
            Validation::fail(ConfigError::InvertedIntervalRange {
                min_ms: interval.min_ms,
                max_ms: interval.max_ms,
            })
        } else {
            Validation::success(())
        });

        checks.push(if interval.min_ms == 0 {
            Validation::fail(ConfigError::ZeroIntervalMinimum)
        } else {
            Validation::success(())
        });

        checks.push(if interval.granularity_ms == 0 {
            Validation::fail(ConfigError::ZeroGranularity)
        } else {
            Validation::success(())
        });

        let in_range = (interval.min_ms..=interval.max_ms).contains(&interval.default_ms);
        checks.push(if in_range {
            Validation::success(())
        } else {
            Validation::fail(ConfigError::DefaultIntervalOutOfRange {
                default_ms: interval.default_ms,
                min_ms: interval.min_ms,
                max_ms: interval.max_ms,
            })
        });

        Validation::all_vec(checks).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_scenario() {
        let config = SimulationConfig::default();
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.interval.min(), Duration::from_millis(500));
        assert_eq!(config.interval.max(), Duration::from_millis(3000));
        assert_eq!(config.interval.default_interval(), Duration::from_millis(1500));
        assert_eq!(config.roll.total(), Duration::from_millis(2000));
        assert!(matches!(config.validate(), Validation::Success(_)));
    }

    #[test]
    fn fit_clamps_and_snaps() {
        let range = IntervalRange::default();
        assert_eq!(range.fit(Duration::ZERO), Duration::from_millis(500));
        assert_eq!(range.fit(Duration::from_millis(549)), Duration::from_millis(500));
        assert_eq!(range.fit(Duration::from_millis(550)), Duration::from_millis(600));
        assert_eq!(range.fit(Duration::from_millis(3000)), Duration::from_millis(3000));
        assert_eq!(range.fit(Duration::from_millis(2990)), Duration::from_millis(3000));
    }

    #[test]
    fn fit_never_exceeds_max_off_grid() {
        let range = IntervalRange {
            min_ms: 500,
            max_ms: 1250,
            granularity_ms: 200,
            default_ms: 500,
        };
        assert_eq!(range.fit(Duration::from_millis(1240)), Duration::from_millis(1250));
    }

    #[test]
    fn validation_accumulates_all_errors() {
        let config = SimulationConfig {
            history_capacity: 0,
            interval: IntervalRange {
                min_ms: 0,
                max_ms: 100,
                granularity_ms: 0,
                default_ms: 500,
            },
            ..SimulationConfig::default()
        };

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 4);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigError::ZeroHistoryCapacity)));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigError::ZeroIntervalMinimum)));
                assert!(errors.iter().any(|e| matches!(e, ConfigError::ZeroGranularity)));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigError::DefaultIntervalOutOfRange { .. })));
            }
            Validation::Success(_) => panic!("Expected validation failure"),
        }
    }

    #[test]
    fn inverted_range_is_reported() {
        let config = SimulationConfig {
            interval: IntervalRange {
                min_ms: 3000,
                max_ms: 500,
                granularity_ms: 100,
                default_ms: 1000,
            },
            ..SimulationConfig::default()
        };

        match config.validate() {
            Validation::Failure(errors) => {
                assert!(errors.iter().any(|e| matches!(
                    e,
                    ConfigError::InvertedIntervalRange {
                        min_ms: 3000,
                        max_ms: 500
                    }
                )));
            }
            Validation::Success(_) => panic!("Expected validation failure"),
        }
    }

    #[test]
    fn json_overrides_nested_fields() {
        let config = SimulationConfig::from_json(
            r#"{ "interval": { "default_ms": 800 }, "roll": { "frames": 0 } }"#,
        )
        .unwrap();
        assert_eq!(config.interval.default_ms, 800);
        assert_eq!(config.interval.min_ms, 500);
        assert_eq!(config.roll.frames, 0);
        assert_eq!(config.roll.reveal_delay_ms, 500);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = SimulationConfig::from_json("{ history_capacity: }");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
