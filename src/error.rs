//! Error types for the chronicle engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChronicleError {
    #[error("Invalid storyline configuration: {0}")]
    InvalidConfig(String),

    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("Choice {index} out of range for scene '{scene}' ({available} available)")]
    ChoiceOutOfRange {
        scene: String,
        index: usize,
        available: usize,
    },

    #[error("Session already ended: {0}")]
    SessionEnded(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChronicleError>;
