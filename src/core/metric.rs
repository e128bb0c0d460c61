//! Metric definitions
//!
//! A metric is a bounded numeric indicator of simulated organizational
//! health. Definitions are immutable configuration shared by all sessions;
//! live values belong to [`crate::core::MetricSet`].

use crate::{ChronicleError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identifier for a metric (unique key within a storyline)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricId(String);

impl MetricId {
    pub fn new(id: impl Into<String>) -> Self {
        MetricId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MetricId {
    fn from(s: &str) -> Self {
        MetricId(s.to_string())
    }
}

impl std::borrow::Borrow<str> for MetricId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Which end of the range is the good one
///
/// A score-framed metric ("security posture") wants high values; a
/// risk-framed metric ("security risk") wants low ones. All threshold logic
/// goes through this field - metrics are never special-cased by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdealDirection {
    #[default]
    High,
    Low,
}

fn default_max() -> i64 {
    100
}

/// Immutable definition of a single metric
///
/// Defined at storyline construction time and shared read-only by every
/// session. `failure_bound` defaults to the bad-end extreme of the range
/// (min for high-is-good, max for low-is-good); crossing it loses the game
/// with `failure_message`. `breach_on_failure` marks the one outcome the
/// renderer presents differently (visual theme swap on a security failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub id: MetricId,
    pub label: String,

    #[serde(default)]
    pub description: String,

    /// Starting value for a fresh session
    pub initial: i64,

    #[serde(default)]
    pub min: i64,

    #[serde(default = "default_max")]
    pub max: i64,

    #[serde(default)]
    pub ideal_direction: IdealDirection,

    /// Explicit failure bound, overriding the range extreme
    #[serde(default)]
    pub failure_bound: Option<i64>,

    /// Lose message when this metric crosses its failure bound
    #[serde(default)]
    pub failure_message: Option<String>,

    /// Signal the renderer to swap visual theme when this metric fails
    #[serde(default)]
    pub breach_on_failure: bool,
}

impl MetricDefinition {
    /// Check bounds consistency; a definition failing here must prevent
    /// session start.
    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(ChronicleError::InvalidConfig(format!(
                "metric '{}' has min {} > max {}",
                self.id, self.min, self.max
            )));
        }
        if self.initial < self.min || self.initial > self.max {
            return Err(ChronicleError::InvalidConfig(format!(
                "metric '{}' initial value {} outside [{}, {}]",
                self.id, self.initial, self.min, self.max
            )));
        }
        if let Some(bound) = self.failure_bound {
            if bound < self.min || bound > self.max {
                return Err(ChronicleError::InvalidConfig(format!(
                    "metric '{}' failure bound {} outside [{}, {}]",
                    self.id, bound, self.min, self.max
                )));
            }
        }
        Ok(())
    }

    /// The value at which this metric fails (the bound nearer its bad end)
    pub fn failure_limit(&self) -> i64 {
        self.failure_bound.unwrap_or(match self.ideal_direction {
            IdealDirection::High => self.min,
            IdealDirection::Low => self.max,
        })
    }

    /// Has `value` crossed the failure bound?
    pub fn is_failed(&self, value: i64) -> bool {
        match self.ideal_direction {
            IdealDirection::High => value <= self.failure_limit(),
            IdealDirection::Low => value >= self.failure_limit(),
        }
    }

    /// Value mapped so that higher is always better
    ///
    /// High-is-good metrics score as their raw value; low-is-good metrics
    /// are mirrored across the range. Win thresholds compare against this.
    pub fn goodness(&self, value: i64) -> i64 {
        match self.ideal_direction {
            IdealDirection::High => value,
            IdealDirection::Low => self.min + self.max - value,
        }
    }

    /// Position of `value` within the range, as 0..=100
    pub fn percent_of_range(&self, value: i64) -> f64 {
        if self.max == self.min {
            return 100.0;
        }
        let pct = (value - self.min) as f64 / (self.max - self.min) as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }

    /// Lose message for this metric, with a generic fallback
    pub fn failure_text(&self) -> Cow<'_, str> {
        match &self.failure_message {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(format!("{} has collapsed; the story is over.", self.label)),
        }
    }
}
