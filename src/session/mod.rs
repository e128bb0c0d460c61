//! Session runtime: state machine, outcome policy, logging, and drivers

pub mod controller;
pub mod effect_log;
pub mod logger;
pub mod outcome;
pub mod state;
pub mod view;

pub use controller::{
    drive, ChoiceController, FirstChoiceController, PlaythroughResult, RandomController,
    ScriptedController, StopReason,
};
pub use effect_log::{EffectLog, EffectLogEntry};
pub use logger::{LogEntry, OutputFormat, OutputMode, SessionLogger, VerbosityLevel};
pub use outcome::{Outcome, OutcomeEvaluator, OutcomePolicy, WinTier};
pub use state::{GameSession, SessionState};
pub use view::{ChoiceView, EndedView, MetricView, ObjectiveView, SceneView, SessionView};
