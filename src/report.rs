//! Human readable rendering of a run
//!
//! [`RunReport`] is the end-of-run summary and [`print_progress`] renders the
//! live event stream while workers are running.

use crate::context::file_system::FileSystemOperations;
use crate::display::{format_elapsed, truncate};
use crate::executor::{ProgressEvent, RunSummary};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

const DESCRIPTION_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTask {
    pub description: String,
    pub error: String,
}

/// End-of-run report built from a [`RunSummary`].
#[derive(Debug, Clone)]
pub struct RunReport {
    generated_files: Vec<PathBuf>,
    failed_tasks: Vec<FailedTask>,
    elapsed: Duration,
    worker_count: usize,
}

impl RunReport {
    /// Files of completed tasks are listed only if they exist on disk.
    pub async fn build(summary: &RunSummary, file_system: &dyn FileSystemOperations) -> Self {
        let mut generated_files = Vec::new();
        for path in summary.files_written() {
            match file_system.exists(path).await {
                Ok(true) => generated_files.push(path.clone()),
                Ok(false) => tracing::debug!(path = %path.display(), "written file no longer exists"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not check file"),
            }
        }

        let failed_tasks = summary
            .outcomes()
            .iter()
            .filter_map(|outcome| {
                outcome.error().map(|error| FailedTask {
                    description: outcome.task().description.clone(),
                    error: error.to_string(),
                })
            })
            .collect();

        Self {
            generated_files,
            failed_tasks,
            elapsed: summary.elapsed(),
            worker_count: summary.worker_count(),
        }
    }

    pub fn generated_files(&self) -> &[PathBuf] {
        &self.generated_files
    }

    pub fn failed_tasks(&self) -> &[FailedTask] {
        &self.failed_tasks
    }

    pub fn failed_count(&self) -> usize {
        self.failed_tasks.len()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run complete")?;
        if !self.generated_files.is_empty() {
            writeln!(f, "Generated files:")?;
            for path in &self.generated_files {
                writeln!(f, "  - {}", path.display())?;
            }
        }
        if !self.failed_tasks.is_empty() {
            writeln!(f, "Failed tasks: {}", self.failed_tasks.len())?;
            for failed in &self.failed_tasks {
                writeln!(
                    f,
                    "  - {}: {}",
                    truncate(&failed.description, DESCRIPTION_WIDTH),
                    failed.error
                )?;
            }
        }
        writeln!(f, "Elapsed: {}", format_elapsed(self.elapsed))?;
        write!(f, "Workers: {}", self.worker_count)
    }
}

/// One status line for a progress event.
pub fn format_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::WorkerStarted {
            worker_id,
            description,
            ..
        } => format!(
            "[worker {worker_id}] processing: {}",
            truncate(description, DESCRIPTION_WIDTH)
        ),
        ProgressEvent::Retrying {
            worker_id,
            description,
            attempt,
            delay,
            reason,
            ..
        } => format!(
            "[worker {worker_id}] retrying: {} (attempt {attempt} in {}s): {reason}",
            truncate(description, DESCRIPTION_WIDTH),
            delay.as_secs()
        ),
        ProgressEvent::TaskCompleted {
            worker_id,
            description,
            ..
        } => format!(
            "[worker {worker_id}] completed: {}",
            truncate(description, DESCRIPTION_WIDTH)
        ),
        ProgressEvent::TaskFailed {
            worker_id,
            description,
            error,
            ..
        } => format!(
            "[worker {worker_id}] failed: {}: {error}",
            truncate(description, DESCRIPTION_WIDTH)
        ),
    }
}

/// Prints every event until all senders are dropped.
pub async fn print_progress(mut rx: mpsc::Receiver<ProgressEvent>) {
    while let Some(event) = rx.recv().await {
        println!("{}", format_event(&event));
    }
}
