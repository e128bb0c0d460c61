//! Scenes and choices
//!
//! A scene is a node in the narrative graph: context text, presentation
//! metadata, and an ordered list of choices. Scenes are immutable once the
//! storyline is constructed.

use crate::core::metric::MetricId;
use crate::{ChronicleError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a scene (graph node key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        SceneId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        SceneId(s.to_string())
    }
}

impl std::borrow::Borrow<str> for SceneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Character fronting a scene (display only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,
    pub role: String,
    pub initials: String,
}

/// A selectable option within a scene
///
/// `effects` is sparse: unlisted metrics are unaffected. A `None` successor
/// marks the end of the storyline; `end_message` is only consulted then, and
/// only when no threshold outcome overrides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub text: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub effects: FxHashMap<MetricId, i64>,

    #[serde(default)]
    pub next_scene_id: Option<SceneId>,

    #[serde(default)]
    pub end_message: Option<String>,
}

/// A node in the narrative graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub title: String,

    /// Timeline label shown alongside the title (e.g. a fiscal quarter)
    #[serde(default)]
    pub period: String,

    #[serde(default)]
    pub speaker: Option<Speaker>,

    /// Objective tags, resolved to descriptions by the storyline table
    #[serde(default)]
    pub objectives: Vec<String>,

    pub text: String,

    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl Scene {
    /// A scene whose choices all lack a successor ends the session
    pub fn is_terminal(&self) -> bool {
        !self.choices.is_empty() && self.choices.iter().all(|c| c.next_scene_id.is_none())
    }

    /// Choice by index, range-checked
    pub fn choice(&self, index: usize) -> Result<&Choice> {
        self.choices
            .get(index)
            .ok_or_else(|| ChronicleError::ChoiceOutOfRange {
                scene: self.id.to_string(),
                index,
                available: self.choices.len(),
            })
    }
}
