//! Ordered record of metric changes for display and audit

use crate::core::{MetricId, RealizedDelta};
use serde::Serialize;

/// One applied metric change
///
/// `delta` is the realized (post-clamp) change, which may differ from the
/// delta the choice requested at range boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectLogEntry {
    pub metric: MetricId,
    pub label: String,
    pub delta: i64,
}

impl EffectLogEntry {
    pub fn from_realized(realized: &RealizedDelta, label: impl Into<String>) -> Self {
        EffectLogEntry {
            metric: realized.id.clone(),
            label: label.into(),
            delta: realized.applied,
        }
    }
}

/// Append-only effect history for one session, cleared on reset
#[derive(Debug, Clone, Default, Serialize)]
pub struct EffectLog {
    entries: Vec<EffectLogEntry>,
}

impl EffectLog {
    pub fn new() -> Self {
        EffectLog::default()
    }

    pub fn append(&mut self, entry: EffectLogEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[EffectLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut log = EffectLog::new();
        log.append(EffectLogEntry {
            metric: MetricId::new("a"),
            label: "A".to_string(),
            delta: 5,
        });
        log.append(EffectLogEntry {
            metric: MetricId::new("b"),
            label: "B".to_string(),
            delta: -3,
        });
        let deltas: Vec<i64> = log.entries().iter().map(|e| e.delta).collect();
        assert_eq!(deltas, vec![5, -3]);
    }

    #[test]
    fn test_clear_empties_log() {
        let mut log = EffectLog::new();
        log.append(EffectLogEntry {
            metric: MetricId::new("a"),
            label: "A".to_string(),
            delta: 1,
        });
        log.clear();
        assert!(log.is_empty());
    }
}
