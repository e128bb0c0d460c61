//! The game session state machine
//!
//! A session owns its metric set and effect log exclusively and borrows the
//! storyline as read-only shared configuration, so independent sessions can
//! run concurrently against one storyline. Each `submit_choice` runs to
//! completion before another mutating call is accepted (enforced by `&mut`).

use crate::core::{MetricSet, Scene, SceneId};
use crate::loader::Storyline;
use crate::session::effect_log::{EffectLog, EffectLogEntry};
use crate::session::logger::{SessionLogger, VerbosityLevel};
use crate::session::outcome::Outcome;
use crate::session::view::{
    ChoiceView, EndedView, MetricView, ObjectiveView, SceneView, SessionView,
};
use crate::{ChronicleError, Result};

/// Where the session is in its lifecycle
///
/// Exactly one scene is current while `Active`; `Ended` is terminal until
/// `reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Active { scene: SceneId },
    Ended { message: String, breach: bool },
}

impl SessionState {
    pub fn is_ended(&self) -> bool {
        matches!(self, SessionState::Ended { .. })
    }
}

/// One playthrough of a storyline
#[derive(Debug)]
pub struct GameSession<'a> {
    storyline: &'a Storyline,
    metrics: MetricSet,
    effect_log: EffectLog,
    state: SessionState,
    pub logger: SessionLogger,
}

impl<'a> GameSession<'a> {
    /// Start a fresh session at the storyline's starting scene
    pub fn new(storyline: &'a Storyline) -> Result<Self> {
        let metrics = MetricSet::new(storyline.metric_definitions_arc())?;
        Ok(GameSession {
            storyline,
            metrics,
            effect_log: EffectLog::new(),
            state: SessionState::Active {
                scene: storyline.graph().start().clone(),
            },
            logger: SessionLogger::new(),
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    pub fn metrics(&self) -> &MetricSet {
        &self.metrics
    }

    pub fn effect_log(&self) -> &EffectLog {
        &self.effect_log
    }

    pub fn storyline(&self) -> &'a Storyline {
        self.storyline
    }

    /// The current scene, while the session is `Active`
    pub fn current_scene(&self) -> Option<&'a Scene> {
        match &self.state {
            // The scene id always resolves: the graph was validated at
            // construction and transitions only follow validated edges.
            SessionState::Active { scene } => self.storyline.graph().get(scene).ok(),
            SessionState::Ended { .. } => None,
        }
    }

    /// Apply one choice and advance the state machine
    ///
    /// `scene_id` must match the current scene; this defends against stale
    /// renderer references. A metric collapse ends the game on the spot,
    /// even when the choice had a successor scene.
    pub fn submit_choice(&mut self, scene_id: &SceneId, choice_index: usize) -> Result<&SessionState> {
        let current = match &self.state {
            SessionState::Ended { message, .. } => {
                return Err(ChronicleError::SessionEnded(message.clone()));
            }
            SessionState::Active { scene } => scene.clone(),
        };

        if *scene_id != current {
            return Err(ChronicleError::SceneNotFound(format!(
                "'{scene_id}' is not the current scene ('{current}')"
            )));
        }

        let storyline = self.storyline;
        let scene = storyline.graph().get(&current)?;
        let choice = scene.choice(choice_index)?;

        self.logger.log_with_category(
            VerbosityLevel::Normal,
            &format!("[{}] {}", scene.id, choice.text),
            "choice",
        );

        for realized in self.metrics.apply(&choice.effects) {
            let label = storyline
                .metric_label(&realized.id)
                .unwrap_or_else(|| realized.id.as_str())
                .to_string();
            self.logger.log_with_category(
                VerbosityLevel::Verbose,
                &format!(
                    "{label}: requested {:+}, applied {:+}",
                    realized.requested, realized.applied
                ),
                "effect",
            );
            self.effect_log
                .append(EffectLogEntry::from_realized(&realized, label));
        }

        // A mid-story collapse overrides the authored graph edge.
        let outcome = storyline
            .evaluator()
            .evaluate(&self.metrics.snapshot(), false);
        if let Outcome::Lose { message, breach } = outcome {
            self.end(message, breach);
            return Ok(&self.state);
        }

        match &choice.next_scene_id {
            None => {
                // End of storyline: threshold outcome first, then the
                // authored end message, then the generic fallback.
                let (message, breach) = match storyline
                    .evaluator()
                    .evaluate(&self.metrics.snapshot(), true)
                {
                    Outcome::Lose { message, breach } => (message, breach),
                    Outcome::Win { message, .. } => (message, false),
                    Outcome::Continue => (
                        choice
                            .end_message
                            .clone()
                            .unwrap_or_else(|| storyline.evaluator().policy().ended_fallback.clone()),
                        false,
                    ),
                };
                self.end(message, breach);
            }
            Some(next) => {
                self.logger.log_with_category(
                    VerbosityLevel::Normal,
                    &format!("-> {next}"),
                    "transition",
                );
                self.state = SessionState::Active {
                    scene: next.clone(),
                };
            }
        }

        Ok(&self.state)
    }

    /// Return to the starting scene with fresh metrics and an empty effect
    /// log, regardless of prior state
    pub fn reset(&mut self) {
        self.metrics.reinitialize();
        self.effect_log.clear();
        self.state = SessionState::Active {
            scene: self.storyline.graph().start().clone(),
        };
        self.logger
            .log_with_category(VerbosityLevel::Normal, "session reset", "session");
    }

    fn end(&mut self, message: String, breach: bool) {
        self.logger
            .log_with_category(VerbosityLevel::Minimal, &message, "outcome");
        self.state = SessionState::Ended { message, breach };
    }

    /// Build the outbound renderer view for the current state
    pub fn view(&self) -> SessionView {
        let snapshot = self.metrics.snapshot();
        let metrics = snapshot
            .iter()
            .map(|(def, value)| MetricView {
                id: def.id.clone(),
                label: def.label.clone(),
                value,
                percent: def.percent_of_range(value),
            })
            .collect();

        let scene = self.current_scene().map(|scene| SceneView {
            id: scene.id.to_string(),
            title: scene.title.clone(),
            period: scene.period.clone(),
            speaker: scene.speaker.clone(),
            objectives: scene
                .objectives
                .iter()
                .map(|tag| ObjectiveView {
                    tag: tag.clone(),
                    description: self
                        .storyline
                        .objective_description(tag)
                        .unwrap_or(tag)
                        .to_string(),
                })
                .collect(),
            text: scene.text.clone(),
            choices: scene
                .choices
                .iter()
                .enumerate()
                .map(|(index, choice)| ChoiceView {
                    index,
                    text: choice.text.clone(),
                    tags: choice.tags.clone(),
                })
                .collect(),
        });

        let ended = match &self.state {
            SessionState::Ended { message, breach } => Some(EndedView {
                message: message.clone(),
                breach: *breach,
            }),
            SessionState::Active { .. } => None,
        };

        SessionView {
            storyline_title: self.storyline.title().to_string(),
            scene,
            metrics,
            effect_log: self.effect_log.entries().to_vec(),
            ended,
        }
    }
}
