//! Generation service abstraction
//!
//! The executor only sees [`GenerationService`]; the concrete HTTP client is
//! built once per run by a [`GenerationServiceFactory`] from the stored
//! credential, so a missing or rejected credential fails before any task runs.

use crate::error::GenerationError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiServiceFactory};

/// Current content of an output file that already exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingFile {
    pub path: PathBuf,
    pub content: String,
}

/// Produces source code for a task description.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generates content for `description`, with `context` describing the project.
    /// `context` may be empty. When `existing_files` is non-empty the model is
    /// asked to edit that code rather than start from scratch.
    async fn generate(
        &self,
        description: &str,
        context: &str,
        use_high_quality_model: bool,
        existing_files: &[ExistingFile],
    ) -> Result<String, GenerationError>;
}

/// Builds a generation service for one run.
pub trait GenerationServiceFactory: Send + Sync {
    fn create(&self, credential: &str) -> Result<Arc<dyn GenerationService>, GenerationError>;
}
