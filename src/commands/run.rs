use super::Command;
use crate::context::AppContext;
use crate::executor::TaskExecutor;
use crate::report::{RunReport, print_progress};
use async_trait::async_trait;
use std::error::Error;
use tokio::sync::mpsc;

const PROGRESS_BUFFER: usize = 256;

/// Executes every queued task, prints the run report and clears the queue.
pub struct RunCommand {
    /// Worker count; falls back to `run.default_workers` from settings
    pub parallel: Option<usize>,
}

#[async_trait]
impl Command for RunCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let queue = ctx.task_queue();
        let tasks = queue.load_tasks().await?;

        if tasks.is_empty() {
            println!("No tasks in queue");
            return Ok(());
        }

        let workers = self
            .parallel
            .unwrap_or(ctx.settings().run.default_workers)
            .max(1);
        println!(
            "Starting code generation... (tasks: {}, workers: {})",
            tasks.len(),
            workers
        );

        let (progress_tx, progress_rx) = mpsc::channel(PROGRESS_BUFFER);
        let printer = tokio::spawn(print_progress(progress_rx));

        let result = TaskExecutor::new(ctx)
            .with_progress(progress_tx)
            .execute(tasks, workers)
            .await;

        // The executor and its sender are gone, so the printer drains and exits
        if let Err(e) = printer.await {
            tracing::warn!(error = %e, "progress printer stopped unexpectedly");
        }

        // A failed precondition means nothing ran, keep the queue for the next attempt
        let summary = result?;

        let report = RunReport::build(&summary, ctx.file_system().as_ref()).await;
        println!("\n{report}");

        queue.clear_tasks().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::test_context;
    use crate::task::Task;
    use crate::test_utils::ScriptedGenerationService;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_empty_queue_does_nothing() {
        let test = test_context("key", ScriptedGenerationService::new());

        RunCommand { parallel: None }
            .execute(&test.ctx)
            .await
            .unwrap();

        assert_eq!(test.factory.create_count(), 0);
    }

    #[tokio::test]
    async fn test_run_generates_files_and_clears_queue() {
        let test = test_context("key", ScriptedGenerationService::new());
        let queue = test.ctx.task_queue();
        queue
            .add_task(Task::test_task("a", &["src/a.rs"]))
            .await
            .unwrap();
        queue
            .add_task(Task::test_task("b", &["src/b.rs", "src/b_copy.rs"]))
            .await
            .unwrap();

        RunCommand { parallel: Some(2) }
            .execute(&test.ctx)
            .await
            .unwrap();

        assert_eq!(test.service.call_count(), 2);
        assert_eq!(
            test.fs.content("src/a.rs").as_deref(),
            Some("// generated: generate a")
        );
        assert_eq!(test.fs.content("src/b.rs"), test.fs.content("src/b_copy.rs"));
        assert!(queue.load_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_clears_queue_even_when_a_task_fails() {
        let test = test_context(
            "key",
            ScriptedGenerationService::new().fail_times("generate a", 2),
        );
        let queue = test.ctx.task_queue();
        queue
            .add_task(Task::test_task("a", &["src/a.rs"]))
            .await
            .unwrap();
        queue
            .add_task(Task::test_task("b", &["src/b.rs"]))
            .await
            .unwrap();

        RunCommand { parallel: Some(2) }
            .execute(&test.ctx)
            .await
            .unwrap();

        assert!(queue.load_tasks().await.unwrap().is_empty());
        assert_eq!(test.fs.content("src/a.rs"), None);
        assert!(test.fs.content("src/b.rs").is_some());
        assert_eq!(test.service.calls_for("generate a"), 2);
        // Backoff goes through the context's sleeper, never the real clock
        assert_eq!(test.sleeper.sleeps(), vec![Duration::from_secs(2)]);
    }

    #[tokio::test]
    async fn test_run_without_credential_keeps_queue() {
        let test = test_context("", ScriptedGenerationService::new());
        let queue = test.ctx.task_queue();
        queue
            .add_task(Task::test_task("a", &["src/a.rs"]))
            .await
            .unwrap();

        let err = RunCommand { parallel: None }
            .execute(&test.ctx)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("API key not set"));
        assert_eq!(queue.load_tasks().await.unwrap().len(), 1);
        assert_eq!(test.service.call_count(), 0);
    }
}
