use crate::task::TaskOutcome;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Aggregated result of one run, derived entirely from the task outcomes.
#[derive(Debug, Clone)]
pub struct RunSummary {
    files_written: Vec<PathBuf>,
    failed_count: usize,
    elapsed: Duration,
    worker_count: usize,
    outcomes: Vec<TaskOutcome>,
}

impl RunSummary {
    pub fn empty(worker_count: usize, elapsed: Duration) -> Self {
        Self::from_outcomes(Vec::new(), elapsed, worker_count)
    }

    /// Builds the summary from outcomes in completion order.
    pub fn from_outcomes(outcomes: Vec<TaskOutcome>, elapsed: Duration, worker_count: usize) -> Self {
        let mut seen = HashSet::new();
        let mut files_written = Vec::new();
        for outcome in outcomes.iter().filter(|o| o.is_completed()) {
            for path in &outcome.task().output_files {
                if seen.insert(path.clone()) {
                    files_written.push(path.clone());
                }
            }
        }
        let failed_count = outcomes.iter().filter(|o| !o.is_completed()).count();

        Self {
            files_written,
            failed_count,
            elapsed,
            worker_count,
            outcomes,
        }
    }

    /// Paths written by completed tasks, without duplicates, in completion order.
    pub fn files_written(&self) -> &[PathBuf] {
        &self.files_written
    }

    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    pub fn completed_count(&self) -> usize {
        self.outcomes.len() - self.failed_count
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn outcomes(&self) -> &[TaskOutcome] {
        &self.outcomes
    }
}
