//! End-of-game evaluation
//!
//! A pure policy from metric state (plus an end-of-storyline flag) to an
//! optional outcome. Hard failures are checked metric-by-metric in
//! declaration order, so when two metrics have both collapsed the
//! earlier-declared one supplies the message. Soft win thresholds apply
//! only once the storyline has actually ended.

use crate::core::MetricSnapshot;
use serde::{Deserialize, Serialize};

fn default_win_threshold() -> i64 {
    70
}

fn default_modest_message() -> String {
    "The storyline ends with modest gains. You win.".to_string()
}

fn default_excellent_message() -> String {
    "The storyline ends in excellent shape across the board. You win!".to_string()
}

fn default_ended_fallback() -> String {
    "This storyline has ended.".to_string()
}

/// Tunable win policy, part of storyline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomePolicy {
    /// Goodness score every metric must reach for an excellent finish
    #[serde(default = "default_win_threshold")]
    pub win_threshold: i64,

    #[serde(default = "default_modest_message")]
    pub modest_message: String,

    #[serde(default = "default_excellent_message")]
    pub excellent_message: String,

    /// Used when the storyline ends without a threshold outcome or an
    /// authored end message
    #[serde(default = "default_ended_fallback")]
    pub ended_fallback: String,
}

impl Default for OutcomePolicy {
    fn default() -> Self {
        OutcomePolicy {
            win_threshold: default_win_threshold(),
            modest_message: default_modest_message(),
            excellent_message: default_excellent_message(),
            ended_fallback: default_ended_fallback(),
        }
    }
}

/// How well a finished playthrough went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WinTier {
    /// At least one metric finished under the win threshold
    Modest,
    /// Every metric finished at or above the win threshold
    Excellent,
}

/// Result of evaluating the current metric state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep playing
    Continue,
    Win {
        tier: WinTier,
        message: String,
    },
    Lose {
        message: String,
        /// Renderer signal: this failure gets the breach presentation
        breach: bool,
    },
}

impl Outcome {
    pub fn is_ended(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

/// Pure evaluator over metric snapshots
#[derive(Debug, Clone)]
pub struct OutcomeEvaluator {
    policy: OutcomePolicy,
}

impl OutcomeEvaluator {
    pub fn new(policy: OutcomePolicy) -> Self {
        OutcomeEvaluator { policy }
    }

    pub fn policy(&self) -> &OutcomePolicy {
        &self.policy
    }

    /// Evaluate the metric state, first match wins
    ///
    /// 1. Any metric past its failure bound loses immediately, in metric
    ///    declaration order - even mid-story.
    /// 2. At the end of the storyline, every metric at or above the win
    ///    threshold (by goodness score) is an excellent finish; otherwise
    ///    the finish is modest.
    /// 3. Otherwise the session continues.
    pub fn evaluate(&self, metrics: &MetricSnapshot, end_of_storyline: bool) -> Outcome {
        for (def, value) in metrics.iter() {
            if def.is_failed(value) {
                return Outcome::Lose {
                    message: def.failure_text().into_owned(),
                    breach: def.breach_on_failure,
                };
            }
        }

        if end_of_storyline {
            let all_good = metrics
                .iter()
                .all(|(def, value)| def.goodness(value) >= self.policy.win_threshold);
            return if all_good {
                Outcome::Win {
                    tier: WinTier::Excellent,
                    message: self.policy.excellent_message.clone(),
                }
            } else {
                Outcome::Win {
                    tier: WinTier::Modest,
                    message: self.policy.modest_message.clone(),
                }
            };
        }

        Outcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IdealDirection, MetricDefinition, MetricId, MetricSet};
    use std::sync::Arc;

    fn def(id: &str, initial: i64) -> MetricDefinition {
        MetricDefinition {
            id: MetricId::new(id),
            label: id.to_string(),
            description: String::new(),
            initial,
            min: 0,
            max: 100,
            ideal_direction: IdealDirection::High,
            failure_bound: None,
            failure_message: Some(format!("{id} failed")),
            breach_on_failure: false,
        }
    }

    fn snapshot(defs: Vec<MetricDefinition>) -> MetricSnapshot {
        let set = MetricSet::new(Arc::from(defs)).unwrap();
        set.snapshot()
    }

    fn evaluator() -> OutcomeEvaluator {
        OutcomeEvaluator::new(OutcomePolicy::default())
    }

    #[test]
    fn test_continue_while_healthy_mid_story() {
        let snap = snapshot(vec![def("profit", 50), def("morale", 50)]);
        assert_eq!(evaluator().evaluate(&snap, false), Outcome::Continue);
    }

    #[test]
    fn test_failure_fires_mid_story() {
        let snap = snapshot(vec![def("profit", 0)]);
        let outcome = evaluator().evaluate(&snap, false);
        assert_eq!(
            outcome,
            Outcome::Lose {
                message: "profit failed".to_string(),
                breach: false,
            }
        );
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        // Both metrics are at their floor; the earlier-declared one reports.
        let snap = snapshot(vec![def("profit", 0), def("security", 0)]);
        let outcome = evaluator().evaluate(&snap, true);
        assert!(matches!(
            outcome,
            Outcome::Lose { message, .. } if message == "profit failed"
        ));
    }

    #[test]
    fn test_breach_flag_carried_on_lose() {
        let mut security = def("security", 0);
        security.breach_on_failure = true;
        let snap = snapshot(vec![security]);
        assert!(matches!(
            evaluator().evaluate(&snap, false),
            Outcome::Lose { breach: true, .. }
        ));
    }

    #[test]
    fn test_low_is_good_metric_fails_at_ceiling() {
        let mut risk = def("risk", 50);
        risk.ideal_direction = IdealDirection::Low;
        risk.failure_bound = Some(75);
        risk.initial = 80;
        let snap = snapshot(vec![risk]);
        assert!(matches!(
            evaluator().evaluate(&snap, false),
            Outcome::Lose { .. }
        ));
    }

    #[test]
    fn test_excellent_win_requires_all_at_threshold() {
        let snap = snapshot(vec![def("a", 70), def("b", 85)]);
        assert!(matches!(
            evaluator().evaluate(&snap, true),
            Outcome::Win {
                tier: WinTier::Excellent,
                ..
            }
        ));
    }

    #[test]
    fn test_one_short_metric_downgrades_to_modest() {
        let snap = snapshot(vec![def("a", 69), def("b", 100)]);
        assert!(matches!(
            evaluator().evaluate(&snap, true),
            Outcome::Win {
                tier: WinTier::Modest,
                ..
            }
        ));
    }

    #[test]
    fn test_low_is_good_goodness_feeds_win_check() {
        // Risk 25 on 0..100 mirrors to 75 goodness - above threshold.
        let mut risk = def("risk", 25);
        risk.ideal_direction = IdealDirection::Low;
        risk.failure_bound = Some(90);
        let snap = snapshot(vec![def("a", 90), risk]);
        assert!(matches!(
            evaluator().evaluate(&snap, true),
            Outcome::Win {
                tier: WinTier::Excellent,
                ..
            }
        ));
    }

    #[test]
    fn test_no_win_before_end_of_storyline() {
        let snap = snapshot(vec![def("a", 90)]);
        assert_eq!(evaluator().evaluate(&snap, false), Outcome::Continue);
    }
}
