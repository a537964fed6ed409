//! Parallel execution engine
//!
//! A run spawns a fixed pool of workers over a shared [`TaskSource`]. Each
//! worker claims a task, runs generate-then-write with one retry, and hands
//! the outcome to the aggregator through a channel. The summary is built only
//! after every worker has been joined.

pub mod progress;
pub mod retry;
pub mod summary;
pub mod task_source;


use crate::context::AppContext;
use crate::context::config_store::ConfigStore;
use crate::context::file_system::FileSystemOperations;
use crate::error::{AttemptError, PreconditionError, WriteError};
use crate::generation::{ExistingFile, GenerationService, GenerationServiceFactory};
use crate::task::{Task, TaskOutcome};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

pub use progress::{ProgressEvent, ProgressSender};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use summary::RunSummary;
pub use task_source::TaskSource;

/// Runs queued tasks against the generation service with a bounded worker pool.
pub struct TaskExecutor {
    config_store: Arc<dyn ConfigStore>,
    generation_factory: Arc<dyn GenerationServiceFactory>,
    file_system: Arc<dyn FileSystemOperations>,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    progress: ProgressSender,
    attempt_timeout: Option<Duration>,
}

impl TaskExecutor {
    /// Create an executor using the collaborators of the application context
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            config_store: ctx.config_store(),
            generation_factory: ctx.generation_factory(),
            file_system: ctx.file_system(),
            retry_policy: RetryPolicy::default(),
            sleeper: ctx.sleeper(),
            progress: ProgressSender::disabled(),
            attempt_timeout: None,
        }
    }

    /// Stream progress events to `tx`. Events are dropped if the channel is full.
    pub fn with_progress(mut self, tx: mpsc::Sender<ProgressEvent>) -> Self {
        self.progress = ProgressSender::new(tx);
        self
    }

    /// Bound each generation call. A timed out call counts as a generation failure.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Execute every task with up to `worker_count` concurrent workers.
    ///
    /// Per-task failures are recorded in the returned summary. The only error
    /// is a precondition failure, raised before any task starts.
    pub async fn execute(
        &self,
        tasks: Vec<Task>,
        worker_count: usize,
    ) -> Result<RunSummary, PreconditionError> {
        let start = Instant::now();
        let worker_count = worker_count.max(1);

        if tasks.is_empty() {
            return Ok(RunSummary::empty(worker_count, start.elapsed()));
        }

        let credential = self.config_store.credential().await?;
        if credential.is_empty() {
            return Err(PreconditionError::MissingCredential);
        }
        let context: Arc<str> = Arc::from(self.config_store.context().await?);
        let service = self
            .generation_factory
            .create(&credential)
            .map_err(PreconditionError::ServiceInit)?;

        let source = Arc::new(TaskSource::new(tasks));
        // Workers beyond the task count would exit immediately
        let spawned = worker_count.min(source.len());
        tracing::info!(
            tasks = source.len(),
            workers = worker_count,
            spawned,
            "starting run"
        );

        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let mut workers = JoinSet::new();
        for worker_id in 1..=spawned {
            let worker = Worker {
                id: worker_id,
                service: Arc::clone(&service),
                file_system: Arc::clone(&self.file_system),
                context: Arc::clone(&context),
                retry_policy: self.retry_policy.clone(),
                sleeper: Arc::clone(&self.sleeper),
                progress: self.progress.clone(),
                attempt_timeout: self.attempt_timeout,
            };
            let source = Arc::clone(&source);
            let outcome_tx = outcome_tx.clone();
            workers.spawn(async move { worker.run(&source, &outcome_tx).await });
        }
        drop(outcome_tx);

        while let Some(result) = workers.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "worker terminated unexpectedly");
            }
        }

        let mut reported = vec![false; source.len()];
        let mut outcomes = Vec::with_capacity(source.len());
        while let Some((index, outcome)) = outcome_rx.recv().await {
            reported[index] = true;
            outcomes.push(outcome);
        }

        // A task whose worker panicked never produced an outcome
        for (index, _) in reported.iter().enumerate().filter(|(_, done)| !**done) {
            if let Some(task) = source.get(index) {
                outcomes.push(TaskOutcome::failed(
                    task,
                    0,
                    0,
                    "worker terminated unexpectedly".to_string(),
                ));
            }
        }

        let summary = RunSummary::from_outcomes(outcomes, start.elapsed(), worker_count);
        tracing::info!(
            completed = summary.completed_count(),
            failed = summary.failed_count(),
            elapsed_ms = summary.elapsed().as_millis() as u64,
            "run finished"
        );
        Ok(summary)
    }
}

struct Worker {
    id: usize,
    service: Arc<dyn GenerationService>,
    file_system: Arc<dyn FileSystemOperations>,
    context: Arc<str>,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    progress: ProgressSender,
    attempt_timeout: Option<Duration>,
}

impl Worker {
    async fn run(
        &self,
        source: &TaskSource,
        outcome_tx: &mpsc::UnboundedSender<(usize, TaskOutcome)>,
    ) {
        while let Some((index, task)) = source.claim() {
            tracing::debug!(worker = self.id, task_id = %task.id, "claimed task");
            self.progress.emit(ProgressEvent::WorkerStarted {
                worker_id: self.id,
                task_id: task.id.clone(),
                description: task.description.clone(),
            });

            let outcome = self.process(task).await;
            match outcome.error() {
                None => self.progress.emit(ProgressEvent::TaskCompleted {
                    worker_id: self.id,
                    task_id: outcome.task().id.clone(),
                    description: outcome.task().description.clone(),
                }),
                Some(error) => self.progress.emit(ProgressEvent::TaskFailed {
                    worker_id: self.id,
                    task_id: outcome.task().id.clone(),
                    description: outcome.task().description.clone(),
                    error: error.to_string(),
                }),
            }

            if outcome_tx.send((index, outcome)).is_err() {
                // Aggregator is gone; nothing left to report to
                break;
            }
        }
    }

    async fn process(&self, task: Arc<Task>) -> TaskOutcome {
        // Read once, so a retry sees the same code as the first attempt
        let existing_files = self.read_existing_outputs(&task).await;
        let mut attempt = 1;
        loop {
            let error = match self.attempt(&task, &existing_files).await {
                Ok(()) => return TaskOutcome::completed(task, self.id, attempt),
                Err(error) => error,
            };

            let Some(delay) = self.retry_policy.backoff_after(attempt, &error) else {
                tracing::warn!(worker = self.id, task_id = %task.id, attempt, %error, "task failed");
                let message = if attempt > 1 {
                    format!("failed after retry: {error}")
                } else {
                    error.to_string()
                };
                return TaskOutcome::failed(task, self.id, attempt, message);
            };

            tracing::warn!(
                worker = self.id,
                task_id = %task.id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                %error,
                "attempt failed, retrying"
            );
            self.progress.emit(ProgressEvent::Retrying {
                worker_id: self.id,
                task_id: task.id.clone(),
                description: task.description.clone(),
                attempt: attempt + 1,
                delay,
                reason: error.to_string(),
            });
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }

    /// Current content of the task's output files that already exist.
    ///
    /// Unreadable files are left out of the prompt and overwritten as usual.
    async fn read_existing_outputs(&self, task: &Task) -> Vec<ExistingFile> {
        let mut existing = Vec::new();
        for path in &task.output_files {
            if !self.file_system.exists(path).await.unwrap_or(false) {
                continue;
            }
            match self.file_system.read_file(path).await {
                Ok(content) => existing.push(ExistingFile {
                    path: path.clone(),
                    content,
                }),
                Err(e) => tracing::warn!(
                    worker = self.id,
                    task_id = %task.id,
                    path = %path.display(),
                    error = %e,
                    "could not read existing output file"
                ),
            }
        }
        existing
    }

    /// One generate-then-write cycle. Files written before a failing write stay on disk.
    async fn attempt(
        &self,
        task: &Task,
        existing_files: &[ExistingFile],
    ) -> Result<(), AttemptError> {
        let generation = self.service.generate(
            &task.description,
            &self.context,
            task.use_high_quality_model,
            existing_files,
        );
        let content = match self.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, generation)
                .await
                .map_err(|_| AttemptError::Timeout(limit))??,
            None => generation.await?,
        };

        for path in &task.output_files {
            self.file_system
                .write_file(path, &content)
                .await
                .map_err(|source| WriteError {
                    path: path.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}
