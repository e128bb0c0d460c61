//! Storyline configuration loading
//!
//! Storylines are static content, injected before any session exists: a
//! scene graph, metric definitions, objective-tag descriptions, and the
//! outcome policy. [`StorylineConfig`] is the raw serde shape;
//! [`Storyline`] is the validated, immutable form sessions run against.

use crate::core::{MetricDefinition, MetricId, Scene, SceneGraph, SceneId};
use crate::session::outcome::{OutcomeEvaluator, OutcomePolicy};
use crate::session::state::GameSession;
use crate::{ChronicleError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Raw storyline file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorylineConfig {
    #[serde(default)]
    pub title: String,

    pub metric_definitions: Vec<MetricDefinition>,

    pub scenes: Vec<Scene>,

    pub starting_scene_id: SceneId,

    /// Objective-tag key to human-readable description
    #[serde(default)]
    pub learning_objectives: FxHashMap<String, String>,

    #[serde(default)]
    pub outcome_policy: OutcomePolicy,
}

/// Validated, immutable storyline shared by all sessions
#[derive(Debug, Clone)]
pub struct Storyline {
    title: String,
    graph: SceneGraph,
    metrics: Arc<[MetricDefinition]>,
    objectives: FxHashMap<String, String>,
    evaluator: OutcomeEvaluator,
}

impl Storyline {
    /// Compile and validate a configuration
    ///
    /// Every configuration problem is fatal here; a session must never
    /// start against a storyline that could dangle mid-playthrough.
    pub fn from_config(config: StorylineConfig) -> Result<Self> {
        if config.metric_definitions.is_empty() {
            return Err(ChronicleError::InvalidConfig(
                "storyline defines no metrics".to_string(),
            ));
        }

        let mut seen: FxHashSet<&MetricId> = FxHashSet::default();
        for def in &config.metric_definitions {
            def.validate()?;
            if !seen.insert(&def.id) {
                return Err(ChronicleError::InvalidConfig(format!(
                    "duplicate metric id '{}'",
                    def.id
                )));
            }
        }

        let graph = SceneGraph::new(config.scenes, config.starting_scene_id)?;

        Ok(Storyline {
            title: config.title,
            graph,
            metrics: Arc::from(config.metric_definitions),
            objectives: config.learning_objectives,
            evaluator: OutcomeEvaluator::new(config.outcome_policy),
        })
    }

    /// Parse a storyline from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StorylineConfig = serde_json::from_str(json)?;
        Storyline::from_config(config)
    }

    /// Load a storyline from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Storyline::from_json(&json)
    }

    /// Start a new session against this storyline
    pub fn new_session(&self) -> Result<GameSession<'_>> {
        GameSession::new(self)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn metric_definitions(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    pub(crate) fn metric_definitions_arc(&self) -> Arc<[MetricDefinition]> {
        Arc::clone(&self.metrics)
    }

    /// Display label for a metric id
    pub fn metric_label(&self, id: &MetricId) -> Option<&str> {
        self.metrics
            .iter()
            .find(|def| def.id == *id)
            .map(|def| def.label.as_str())
    }

    /// Human-readable description for an objective tag
    pub fn objective_description(&self, tag: &str) -> Option<&str> {
        self.objectives.get(tag).map(|s| s.as_str())
    }

    pub fn evaluator(&self) -> &OutcomeEvaluator {
        &self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "title": "Minimal",
        "metricDefinitions": [
            { "id": "health", "label": "Health", "initial": 50 }
        ],
        "scenes": [
            {
                "id": "start",
                "title": "Start",
                "text": "Begin.",
                "choices": [
                    { "text": "Finish", "effects": { "health": 10 } }
                ]
            }
        ],
        "startingSceneId": "start"
    }"#;

    #[test]
    fn test_minimal_storyline_parses() {
        let storyline = Storyline::from_json(MINIMAL).unwrap();
        assert_eq!(storyline.title(), "Minimal");
        assert_eq!(storyline.graph().len(), 1);
        assert_eq!(storyline.metric_definitions().len(), 1);
        // Defaults: 0..100 range, win threshold 70
        let def = &storyline.metric_definitions()[0];
        assert_eq!((def.min, def.max), (0, 100));
        assert_eq!(storyline.evaluator().policy().win_threshold, 70);
    }

    #[test]
    fn test_empty_metrics_rejected() {
        let json = r#"{
            "metricDefinitions": [],
            "scenes": [
                { "id": "s", "title": "S", "text": "t", "choices": [] }
            ],
            "startingSceneId": "s"
        }"#;
        let err = Storyline::from_json(json).unwrap_err();
        assert!(err.to_string().contains("no metrics"));
    }

    #[test]
    fn test_duplicate_metric_ids_rejected() {
        let json = r#"{
            "metricDefinitions": [
                { "id": "m", "label": "M", "initial": 50 },
                { "id": "m", "label": "M again", "initial": 50 }
            ],
            "scenes": [
                { "id": "s", "title": "S", "text": "t", "choices": [] }
            ],
            "startingSceneId": "s"
        }"#;
        let err = Storyline::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate metric id 'm'"));
    }

    #[test]
    fn test_dangling_reference_rejected_at_load() {
        let json = MINIMAL.replace(
            r#"{ "text": "Finish", "effects": { "health": 10 } }"#,
            r#"{ "text": "Jump", "nextSceneId": "missing" }"#,
        );
        let err = Storyline::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_malformed_json_is_a_serialization_error() {
        assert!(matches!(
            Storyline::from_json("{ not json"),
            Err(ChronicleError::SerializationError(_))
        ));
    }
}
