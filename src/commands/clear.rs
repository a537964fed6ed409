use super::Command;
use crate::context::AppContext;
use async_trait::async_trait;
use std::error::Error;

pub struct ClearCommand;

#[async_trait]
impl Command for ClearCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        ctx.task_queue().clear_tasks().await?;
        println!("Queue cleared");
        Ok(())
    }
}
