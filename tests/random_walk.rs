//! Randomized playthrough tests
//!
//! Long seeded walks over the demo storyline: same seed must replay the
//! same game, and no sequence of choices may ever push a metric out of its
//! range.

use chronicle::loader::Storyline;
use chronicle::session::{
    drive, ChoiceController, FirstChoiceController, RandomController, SessionState, StopReason,
    VerbosityLevel,
};
use similar_asserts::assert_eq;

fn demo() -> Storyline {
    let path = format!("{}/data/meridian.json", env!("CARGO_MANIFEST_DIR"));
    Storyline::from_file(path).unwrap()
}

fn silent_session(storyline: &Storyline) -> chronicle::session::GameSession<'_> {
    let mut session = storyline.new_session().unwrap();
    session.logger.set_verbosity(VerbosityLevel::Silent);
    session
}

#[test]
fn test_same_seed_replays_identically() {
    let storyline = demo();

    let run = |seed: u64| {
        let mut session = silent_session(&storyline);
        let mut controller = RandomController::with_seed(seed);
        let result = drive(&mut session, &mut controller, 100).unwrap();
        assert_eq!(result.reason, StopReason::Ended);
        (
            session.state().clone(),
            session.effect_log().entries().to_vec(),
        )
    };

    for seed in [0, 1, 42, 0xdead_beef] {
        let (state_a, log_a) = run(seed);
        let (state_b, log_b) = run(seed);
        assert_eq!(state_a, state_b);
        assert_eq!(log_a, log_b);
    }
}

#[test]
fn test_metrics_stay_in_bounds_under_random_play() {
    let storyline = demo();

    for seed in 0..25u64 {
        let mut session = silent_session(&storyline);
        let mut controller = RandomController::with_seed(seed);

        // Step one choice at a time so bounds hold after every mutation,
        // not just at the end.
        for _ in 0..100 {
            if session.is_ended() {
                break;
            }
            let view = session.view();
            let Some(index) = controller.choose(&view) else {
                break;
            };
            let SessionState::Active { scene } = session.state().clone() else {
                break;
            };
            session.submit_choice(&scene, index).unwrap();

            for def in storyline.metric_definitions() {
                let value = session.metrics().get(def.id.as_str()).unwrap();
                assert!(
                    value >= def.min && value <= def.max,
                    "seed {seed}: metric '{}' escaped its range with {value}",
                    def.id
                );
            }
        }
        assert!(session.is_ended(), "seed {seed}: walk did not terminate");
    }
}

#[test]
fn test_effect_log_matches_observed_changes() {
    let storyline = demo();
    let mut session = silent_session(&storyline);
    let mut controller = RandomController::with_seed(7);

    let mut expected_entries = 0;
    for _ in 0..100 {
        if session.is_ended() {
            break;
        }
        let before: Vec<(String, i64)> = storyline
            .metric_definitions()
            .iter()
            .map(|def| {
                (
                    def.id.as_str().to_string(),
                    session.metrics().get(def.id.as_str()).unwrap(),
                )
            })
            .collect();

        let view = session.view();
        let Some(index) = controller.choose(&view) else {
            break;
        };
        let SessionState::Active { scene } = session.state().clone() else {
            break;
        };
        let scene_ref = storyline.graph().get(&scene).unwrap();
        let touched = scene_ref.choices[index].effects.len();
        session.submit_choice(&scene, index).unwrap();

        // Only known metrics produce entries; the demo storyline has none
        // unknown, so every effect key logs exactly one entry.
        expected_entries += touched;
        assert_eq!(session.effect_log().len(), expected_entries);

        // Each new entry's delta equals the observed value change.
        let new_entries =
            &session.effect_log().entries()[expected_entries - touched..expected_entries];
        for entry in new_entries {
            let old = before
                .iter()
                .find(|(id, _)| id == entry.metric.as_str())
                .map(|(_, v)| *v)
                .unwrap();
            let now = session.metrics().get(entry.metric.as_str()).unwrap();
            assert_eq!(entry.delta, now - old);
        }
    }
}

#[test]
fn test_first_choice_walk_terminates() {
    let storyline = demo();
    let mut session = silent_session(&storyline);
    let mut controller = FirstChoiceController;

    let result = drive(&mut session, &mut controller, 100).unwrap();
    assert_eq!(result.reason, StopReason::Ended);
    assert!(session.is_ended());
    // The demo graph is six scenes deep at most.
    assert!(result.steps_taken <= 6);
}

#[test]
fn test_postmortem_ending_is_a_breach() {
    // The published-postmortem choice carries an absurd negative security
    // delta; clamping absorbs it and the breach outcome fires.
    let storyline = demo();
    let mut session = silent_session(&storyline);

    let mut controller = chronicle::session::ScriptedController::new(vec![1, 0, 0, 0, 1]);
    let result = drive(&mut session, &mut controller, 10).unwrap();
    assert_eq!(result.reason, StopReason::Ended);

    let SessionState::Ended { breach, .. } = session.state() else {
        panic!("expected ended session");
    };
    assert!(*breach);
    assert_eq!(session.metrics().get("security"), Some(0));
}
