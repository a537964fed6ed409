use crate::error::TaskError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

const TASK_ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// One queued unit of generation work.
///
/// The same generated content is written to every path in `output_files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub output_files: Vec<PathBuf>,
    /// Selects the slow, high-quality model tier instead of the fast one.
    #[serde(rename = "use_deep", default)]
    pub use_high_quality_model: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task with a fresh id, rejecting an empty description or output list.
    pub fn new(
        description: impl Into<String>,
        output_files: Vec<PathBuf>,
        use_high_quality_model: bool,
    ) -> Result<Self, TaskError> {
        let task = Self {
            id: nanoid::nanoid!(8, &TASK_ID_ALPHABET),
            description: description.into(),
            output_files,
            use_high_quality_model,
            created_at: Some(Utc::now()),
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks the invariants every task must hold for its whole lifetime.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.description.trim().is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        if self.output_files.is_empty() {
            return Err(TaskError::NoOutputFiles);
        }
        if self.output_files.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(TaskError::EmptyOutputPath);
        }
        Ok(())
    }

    /// Human readable model tier name.
    pub fn model_tier(&self) -> &'static str {
        if self.use_high_quality_model {
            "quality"
        } else {
            "fast"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Completed => f.write_str("completed"),
            TaskStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Terminal result of one task in a run. Created once by the worker that owned the task.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    task: Arc<Task>,
    status: TaskStatus,
    error: Option<String>,
    worker_id: usize,
    attempts: u32,
}

impl TaskOutcome {
    pub fn completed(task: Arc<Task>, worker_id: usize, attempts: u32) -> Self {
        Self {
            task,
            status: TaskStatus::Completed,
            error: None,
            worker_id,
            attempts,
        }
    }

    pub fn failed(task: Arc<Task>, worker_id: usize, attempts: u32, error: String) -> Self {
        Self {
            task,
            status: TaskStatus::Failed,
            error: Some(error),
            worker_id,
            attempts,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Present iff the outcome is failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
impl Task {
    /// Builds a valid task with a deterministic id for tests.
    pub fn test_task(id: &str, outputs: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            description: format!("generate {id}"),
            output_files: outputs.iter().map(PathBuf::from).collect(),
            use_high_quality_model: false,
            created_at: None,
        }
    }
}
