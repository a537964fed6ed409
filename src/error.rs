use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fatal setup failures. A run that hits one of these never starts a worker.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("API key not set. Use 'code-parallel api set <key>' to set it")]
    MissingCredential,
    #[error("failed to read configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to create generation client: {0}")]
    ServiceInit(#[source] GenerationError),
}

/// Failures reported by the generation service for a single request.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("model not found: {0}")]
    ModelNotFound(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("failed to parse response: {0}")]
    InvalidResponse(String),
    #[error("no content generated")]
    EmptyResponse,
    #[error("generation error: {0}")]
    Other(String),
}

/// A failed write of generated content to one output path.
#[derive(Debug, Error)]
#[error("failed to save file {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: anyhow::Error,
}

/// Why a single generate-then-write attempt failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}

impl AttemptError {
    /// Write failures back off for less time than generation failures.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, AttemptError::Write(_))
    }
}

/// Queue store failures. These abort the surrounding command.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read task queue {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("task queue {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("task queue contains an invalid task '{id}': {reason}")]
    InvalidTask { id: String, reason: TaskError },
    #[error("failed to write task queue {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine home directory")]
    NoHomeDirectory,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Task invariant violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task description must not be empty")]
    EmptyDescription,
    #[error("task must have at least one output file")]
    NoOutputFiles,
    #[error("output file path must not be empty")]
    EmptyOutputPath,
}
