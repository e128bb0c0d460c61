//! Live metric state for one session
//!
//! Values are mutated only through [`MetricSet::apply`], which clamps every
//! delta into the metric's range and reports the change actually made.

use crate::core::metric::{MetricDefinition, MetricId};
use crate::Result;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::Arc;

/// `clamp(v, lo, hi) = max(lo, min(hi, v))`
pub fn clamp(value: i64, lo: i64, hi: i64) -> i64 {
    value.max(lo).min(hi)
}

/// Change actually applied to one metric (post-clamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealizedDelta {
    pub id: MetricId,
    /// Delta the choice asked for
    pub requested: i64,
    /// Delta after clamping into the metric's range
    pub applied: i64,
}

/// Mutable metric values, always within their definitions' bounds
#[derive(Debug, Clone)]
pub struct MetricSet {
    definitions: Arc<[MetricDefinition]>,
    values: FxHashMap<MetricId, i64>,
}

impl MetricSet {
    /// Create a metric set with every metric at its definition's starting
    /// value. Fails if any definition is inconsistent.
    pub fn new(definitions: Arc<[MetricDefinition]>) -> Result<Self> {
        for def in definitions.iter() {
            def.validate()?;
        }
        let values = definitions
            .iter()
            .map(|def| (def.id.clone(), def.initial))
            .collect();
        Ok(MetricSet {
            definitions,
            values,
        })
    }

    /// Return every metric to its starting value
    pub fn reinitialize(&mut self) {
        for def in self.definitions.iter() {
            self.values.insert(def.id.clone(), def.initial);
        }
    }

    /// Apply a sparse delta mapping, one metric at a time
    ///
    /// Deltas are clamped per metric; the returned batch holds the realized
    /// change for each recognized metric in the effect map, in definition
    /// order. Unknown metric ids are silently ignored - they represent
    /// forward-compatible effect data, not errors.
    pub fn apply(&mut self, effects: &FxHashMap<MetricId, i64>) -> SmallVec<[RealizedDelta; 6]> {
        let mut realized = SmallVec::new();
        for def in self.definitions.iter() {
            let Some(&delta) = effects.get(&def.id) else {
                continue;
            };
            let before = self.values[&def.id];
            let after = clamp(before.saturating_add(delta), def.min, def.max);
            self.values.insert(def.id.clone(), after);
            realized.push(RealizedDelta {
                id: def.id.clone(),
                requested: delta,
                applied: after - before,
            });
        }
        realized
    }

    /// Current value of a metric
    pub fn get(&self, id: &str) -> Option<i64> {
        self.values.get(id).copied()
    }

    /// The definitions this set was built from, in declaration order
    pub fn definitions(&self) -> &[MetricDefinition] {
        &self.definitions
    }

    /// Read-only copy for inspection; does not alias internal storage
    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            definitions: Arc::clone(&self.definitions),
            values: self.values.clone(),
        }
    }
}

/// Immutable point-in-time copy of metric state
///
/// Consumed by the outcome evaluator and the renderer view. Iteration order
/// follows metric declaration order.
#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    definitions: Arc<[MetricDefinition]>,
    values: FxHashMap<MetricId, i64>,
}

impl MetricSnapshot {
    pub fn get(&self, id: &str) -> Option<i64> {
        self.values.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetricDefinition, i64)> {
        self.definitions
            .iter()
            .map(|def| (def, self.values[&def.id]))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
