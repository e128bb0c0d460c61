//! Read-only view of session state for the renderer
//!
//! The core never touches a presentation surface; on every state change the
//! host pulls one of these snapshots and draws it however it likes. All
//! fields are plain data and serialize to JSON for non-Rust hosts.

use crate::core::{MetricId, Speaker};
use crate::session::effect_log::EffectLogEntry;
use serde::Serialize;

/// One metric, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct MetricView {
    pub id: MetricId,
    pub label: String,
    pub value: i64,
    /// Position within the metric's range, 0..=100
    pub percent: f64,
}

/// Objective tag resolved against the storyline's description table
#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveView {
    pub tag: String,
    pub description: String,
}

/// A selectable choice
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceView {
    pub index: usize,
    pub text: String,
    pub tags: Vec<String>,
}

/// The current scene, for an `Active` session
#[derive(Debug, Clone, Serialize)]
pub struct SceneView {
    pub id: String,
    pub title: String,
    pub period: String,
    pub speaker: Option<Speaker>,
    pub objectives: Vec<ObjectiveView>,
    pub text: String,
    pub choices: Vec<ChoiceView>,
}

/// Final outcome, for an `Ended` session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndedView {
    pub message: String,
    /// True only for the security-failure outcome; the renderer swaps
    /// visual theme on it
    pub breach: bool,
}

/// Everything a renderer needs to draw the session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub storyline_title: String,
    /// Present while the session is `Active`
    pub scene: Option<SceneView>,
    pub metrics: Vec<MetricView>,
    pub effect_log: Vec<EffectLogEntry>,
    /// Present once the session is `Ended`
    pub ended: Option<EndedView>,
}

impl SessionView {
    pub fn is_ended(&self) -> bool {
        self.ended.is_some()
    }
}
