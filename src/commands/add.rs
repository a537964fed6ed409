use super::Command;
use crate::context::AppContext;
use crate::task::Task;
use async_trait::async_trait;
use std::error::Error;
use std::path::PathBuf;

/// Trailing marker selecting the high-quality model tier.
const HIGH_QUALITY_MARKER: &str = "deep";

/// Adds one task given as `["description", "out1", ..., "deep"?]`.
pub struct AddCommand {
    pub task_json: String,
}

#[async_trait]
impl Command for AddCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let task = parse_task(&self.task_json)?;
        let description = task.description.clone();

        let queue = ctx.task_queue();
        queue.add_task(task).await?;
        let queued = queue.load_tasks().await?.len();

        println!("Queued task [{queued}]: {description}");
        Ok(())
    }
}

/// Parses the JSON array form of a task.
pub fn parse_task(raw: &str) -> Result<Task, Box<dyn Error>> {
    let args: Vec<String> =
        serde_json::from_str(raw).map_err(|e| format!("Invalid JSON task: {e}"))?;

    if args.len() < 2 {
        return Err("Task must have a description and at least one output file".into());
    }

    let description = args[0].clone();
    let mut outputs = &args[1..];
    let mut use_high_quality_model = false;
    if outputs.last().map(String::as_str) == Some(HIGH_QUALITY_MARKER) {
        use_high_quality_model = true;
        outputs = &outputs[..outputs.len() - 1];
    }

    let task = Task::new(
        description,
        outputs.iter().map(PathBuf::from).collect(),
        use_high_quality_model,
    )?;
    Ok(task)
}
