//! Application layer errors

use thiserror::Error;

use crate::domain::entities::ArtifactKind;

/// General host errors
#[derive(Error, Debug)]
pub enum FrameworkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a single artifact file could not be loaded
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Manifest(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no export declared")]
    MissingExport,

    #[error("unknown export '{0}'")]
    UnknownExport(String),

    #[error("'{export}' is a {found}, expected a {expected}")]
    Mismatch {
        export: String,
        expected: ArtifactKind,
        found: ArtifactKind,
    },
}

impl ArtifactError {
    /// Loaded fine but lacks the expected capability
    pub fn is_structural_mismatch(&self) -> bool {
        matches!(self, ArtifactError::Mismatch { .. })
    }
}

/// Chat client errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Permission denied")]
    PermissionDenied,
}

/// Event handler errors
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Missing event argument: {0}")]
    MissingArgument(String),

    #[error("Client error: {0}")]
    Client(#[from] BotError),

    #[error("Handler failed: {0}")]
    Failed(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
