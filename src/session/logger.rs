//! Centralized logger for session events
//!
//! Narrates scene transitions, applied effects, and outcomes. Output can go
//! to stdout, to an in-memory buffer (for tests and embedding hosts), or
//! both; entries use owned Strings so the buffer has no lifetime ties.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Verbosity level for session output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during play
    Silent = 0,
    /// Minimal - only the final outcome
    Minimal = 1,
    /// Normal - scene transitions and choices (default)
    #[default]
    Normal = 2,
    /// Verbose - every applied effect and evaluation
    Verbose = 3,
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A log entry with owned strings
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g. "choice", "effect", "outcome")
    pub category: Option<String>,
}

/// Guard type that provides read-only access to captured log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Session event logger
pub struct SessionLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,

    /// Captured log entries (owned strings)
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl SessionLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        SessionLogger::with_verbosity(VerbosityLevel::default())
    }

    /// Create a logger with specified verbosity
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        SessionLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to the in-memory buffer only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Read-only access to captured log entries
    ///
    /// Returns a guard that derefs to `[LogEntry]`.
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn log_minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, message, None);
    }

    pub fn log_normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, message, None);
    }

    pub fn log_verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, message, None);
    }

    pub fn log_with_category(&self, level: VerbosityLevel, message: &str, category: &str) {
        self.log(level, message, Some(category));
    }

    fn log(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        if matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both)
            && level <= self.verbosity
        {
            self.log_to_stdout(level, message, category);
        }
        if matches!(self.output_mode, OutputMode::Memory | OutputMode::Both) {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(|c| c.to_string()),
            });
        }
    }

    fn log_to_stdout(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        match self.output_format {
            OutputFormat::Text => {
                if level == VerbosityLevel::Minimal {
                    println!("{message}");
                } else {
                    println!("  {message}");
                }
            }
            OutputFormat::Json => {
                let obj = serde_json::json!({
                    "level": level,
                    "message": message,
                    "category": category,
                });
                println!("{obj}");
            }
        }
    }
}

impl Default for SessionLogger {
    fn default() -> Self {
        SessionLogger::new()
    }
}

impl std::fmt::Debug for SessionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLogger")
            .field("verbosity", &self.verbosity)
            .field("output_format", &self.output_format)
            .field("output_mode", &self.output_mode)
            .field("buffered", &self.log_buffer.borrow().len())
            .finish()
    }
}
