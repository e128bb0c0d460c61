//! The immutable scene graph
//!
//! Constructed once from a fixed set of scenes plus a starting identifier,
//! validated eagerly: a dangling successor discovered mid-playthrough would
//! be unrecoverable for the player, so every reference is checked up front.

use crate::core::scene::{Scene, SceneId};
use crate::{ChronicleError, Result};
use rustc_hash::{FxHashMap, FxHashSet};

/// Static collection of scenes, addressable by identifier
#[derive(Debug, Clone)]
pub struct SceneGraph {
    scenes: FxHashMap<SceneId, Scene>,
    /// Declaration order, for stable iteration and error reporting
    order: Vec<SceneId>,
    start: SceneId,
}

impl SceneGraph {
    /// Build and validate a graph. Collects every problem (duplicate ids,
    /// dangling successors, missing start scene) into a single error rather
    /// than stopping at the first.
    pub fn new(scenes: Vec<Scene>, start: SceneId) -> Result<Self> {
        let mut map = FxHashMap::default();
        let mut order = Vec::with_capacity(scenes.len());
        let mut problems = Vec::new();

        for scene in scenes {
            if map.contains_key(&scene.id) {
                problems.push(format!("duplicate scene id '{}'", scene.id));
                continue;
            }
            order.push(scene.id.clone());
            map.insert(scene.id.clone(), scene);
        }

        if !map.contains_key(&start) {
            problems.push(format!("starting scene '{start}' does not exist"));
        }

        for id in &order {
            for (idx, choice) in map[id].choices.iter().enumerate() {
                if let Some(next) = &choice.next_scene_id {
                    if !map.contains_key(next) {
                        problems.push(format!(
                            "scene '{id}' choice {idx} references missing scene '{next}'"
                        ));
                    }
                }
            }
        }

        if !problems.is_empty() {
            return Err(ChronicleError::InvalidConfig(problems.join("; ")));
        }

        Ok(SceneGraph {
            scenes: map,
            order,
            start,
        })
    }

    /// Scene for a valid identifier
    ///
    /// Ids come only from validated choices, so a miss here is an
    /// integration bug, not a user error.
    pub fn get(&self, id: &SceneId) -> Result<&Scene> {
        self.scenes
            .get(id)
            .ok_or_else(|| ChronicleError::SceneNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &SceneId) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn start(&self) -> &SceneId {
        &self.start
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Scenes in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.order.iter().map(|id| &self.scenes[id])
    }

    /// Scenes not reachable from the start scene
    ///
    /// Unreachable scenes are authoring dead weight rather than a hard
    /// error; the validate command reports them as warnings.
    pub fn unreachable(&self) -> Vec<SceneId> {
        let mut seen: FxHashSet<&SceneId> = FxHashSet::default();
        let mut frontier = vec![&self.start];
        while let Some(id) = frontier.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(scene) = self.scenes.get(id) {
                for choice in &scene.choices {
                    if let Some(next) = &choice.next_scene_id {
                        if !seen.contains(next) {
                            frontier.push(next);
                        }
                    }
                }
            }
        }
        self.order
            .iter()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect()
    }
}
