//! Error types for the frame engine.

use thiserror::Error;

/// Pattern synthesis errors
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Invalid max dimension: {0} (must be between 1 and {max})", max = crate::pattern::MAX_DIMENSION_LIMIT)]
    InvalidDimension(u32),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Errors surfaced by the generation dispatcher
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Message codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Synthesis worker is not running")]
    WorkerUnavailable,

    #[error("Failed to start synthesis worker: {0}")]
    Spawn(#[from] std::io::Error),
}

impl From<SynthesisError> for DispatchError {
    fn from(err: SynthesisError) -> Self {
        DispatchError::Synthesis(err.to_string())
    }
}

/// Host-level errors: configuration and logging setup
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Config(err.to_string())
    }
}
