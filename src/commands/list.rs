use super::Command;
use crate::context::AppContext;
use crate::display::{print_columns, truncate};
use async_trait::async_trait;
use std::error::Error;

pub struct ListCommand;

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let tasks = ctx.task_queue().load_tasks().await?;

        if tasks.is_empty() {
            println!("No tasks in queue");
            return Ok(());
        }

        println!("Tasks in queue: {}\n", tasks.len());
        let rows: Vec<Vec<String>> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let outputs: Vec<String> = task
                    .output_files
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                vec![
                    (i + 1).to_string(),
                    task.id.clone(),
                    task.model_tier().to_string(),
                    outputs.join(", "),
                    truncate(&task.description, 60),
                ]
            })
            .collect();
        print_columns(&["#", "ID", "Model", "Outputs", "Description"], &rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::test_context;
    use crate::task::Task;
    use crate::test_utils::ScriptedGenerationService;

    #[tokio::test]
    async fn test_list_empty_and_populated_queue() {
        let test = test_context("", ScriptedGenerationService::new());
        ListCommand.execute(&test.ctx).await.unwrap();

        test.ctx
            .task_queue()
            .add_task(Task::test_task("a", &["a.rs", "b.rs"]))
            .await
            .unwrap();
        ListCommand.execute(&test.ctx).await.unwrap();
    }
}
