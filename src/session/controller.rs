//! Choice controllers for automated playthroughs
//!
//! Controllers pick a choice index from the read-only session view. They
//! back the automated CLI mode, the integration tests, and the benchmarks;
//! a human player is just the host shell acting as its own controller.

use crate::session::state::{GameSession, SessionState};
use crate::session::view::SessionView;
use crate::Result;
use rand::Rng;

/// Picks the next choice for an active session
pub trait ChoiceController {
    fn name(&self) -> &str;

    /// Choice index for the current scene, or `None` to stop playing
    fn choose(&mut self, view: &SessionView) -> Option<usize>;
}

/// Always takes the first choice (deterministic baseline)
#[derive(Debug, Default)]
pub struct FirstChoiceController;

impl ChoiceController for FirstChoiceController {
    fn name(&self) -> &str {
        "first"
    }

    fn choose(&mut self, view: &SessionView) -> Option<usize> {
        let scene = view.scene.as_ref()?;
        if scene.choices.is_empty() {
            None
        } else {
            Some(0)
        }
    }
}

/// Makes random choices
pub struct RandomController {
    rng: Box<dyn rand::RngCore>,
}

impl RandomController {
    /// Random controller with a nondeterministic RNG
    pub fn new() -> Self {
        RandomController {
            rng: Box::new(rand::thread_rng()),
        }
    }

    /// Random controller with a seeded RNG (for deterministic replay)
    pub fn with_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        RandomController {
            rng: Box::new(rand_chacha::ChaCha12Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomController {
    fn default() -> Self {
        RandomController::new()
    }
}

impl ChoiceController for RandomController {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, view: &SessionView) -> Option<usize> {
        let scene = view.scene.as_ref()?;
        if scene.choices.is_empty() {
            None
        } else {
            Some(self.rng.gen_range(0..scene.choices.len()))
        }
    }
}

/// Replays a fixed list of choice indices
#[derive(Debug, Clone)]
pub struct ScriptedController {
    script: Vec<usize>,
    position: usize,
}

impl ScriptedController {
    pub fn new(script: Vec<usize>) -> Self {
        ScriptedController {
            script,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len().saturating_sub(self.position)
    }
}

impl ChoiceController for ScriptedController {
    fn name(&self) -> &str {
        "scripted"
    }

    fn choose(&mut self, _view: &SessionView) -> Option<usize> {
        let index = self.script.get(self.position).copied()?;
        self.position += 1;
        Some(index)
    }
}

/// Why a driven playthrough stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The session reached `Ended`
    Ended,
    /// The step cap was hit first
    StepLimit,
    /// The controller had no choice to offer
    ControllerStopped,
}

/// Summary of a driven playthrough
#[derive(Debug, Clone)]
pub struct PlaythroughResult {
    pub steps_taken: u32,
    pub reason: StopReason,
}

/// Run a session under a controller until it ends or `max_steps` is hit
///
/// The step cap guards against storyline cycles that a controller could
/// loop in forever.
pub fn drive(
    session: &mut GameSession<'_>,
    controller: &mut dyn ChoiceController,
    max_steps: u32,
) -> Result<PlaythroughResult> {
    let mut steps_taken = 0;
    while steps_taken < max_steps {
        if session.is_ended() {
            return Ok(PlaythroughResult {
                steps_taken,
                reason: StopReason::Ended,
            });
        }
        let view = session.view();
        let Some(index) = controller.choose(&view) else {
            return Ok(PlaythroughResult {
                steps_taken,
                reason: StopReason::ControllerStopped,
            });
        };
        let scene_id = match session.state() {
            SessionState::Active { scene } => scene.clone(),
            SessionState::Ended { .. } => unreachable!("checked above"),
        };
        session.submit_choice(&scene_id, index)?;
        steps_taken += 1;
    }
    let reason = if session.is_ended() {
        StopReason::Ended
    } else {
        StopReason::StepLimit
    };
    Ok(PlaythroughResult {
        steps_taken,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::view::{SceneView, SessionView};

    fn view_with_choices(count: usize) -> SessionView {
        SessionView {
            storyline_title: "Test".to_string(),
            scene: Some(SceneView {
                id: "s".to_string(),
                title: "Scene".to_string(),
                period: String::new(),
                speaker: None,
                objectives: Vec::new(),
                text: String::new(),
                choices: (0..count)
                    .map(|index| crate::session::view::ChoiceView {
                        index,
                        text: format!("choice {index}"),
                        tags: Vec::new(),
                    })
                    .collect(),
            }),
            metrics: Vec::new(),
            effect_log: Vec::new(),
            ended: None,
        }
    }

    #[test]
    fn test_first_choice_controller() {
        let mut controller = FirstChoiceController;
        assert_eq!(controller.choose(&view_with_choices(3)), Some(0));
        assert_eq!(controller.choose(&view_with_choices(0)), None);
    }

    #[test]
    fn test_random_controller_stays_in_range() {
        let mut controller = RandomController::with_seed(42);
        for _ in 0..50 {
            let choice = controller.choose(&view_with_choices(3)).unwrap();
            assert!(choice < 3);
        }
    }

    #[test]
    fn test_seeded_random_determinism() {
        let mut a = RandomController::with_seed(7);
        let mut b = RandomController::with_seed(7);
        let view = view_with_choices(5);
        for _ in 0..20 {
            assert_eq!(a.choose(&view), b.choose(&view));
        }
    }

    #[test]
    fn test_scripted_controller_exhausts() {
        let mut controller = ScriptedController::new(vec![1, 0]);
        let view = view_with_choices(2);
        assert_eq!(controller.choose(&view), Some(1));
        assert_eq!(controller.choose(&view), Some(0));
        assert_eq!(controller.choose(&view), None);
        assert_eq!(controller.remaining(), 0);
    }
}
