use super::Command;
use crate::context::AppContext;
use async_trait::async_trait;
use std::error::Error;

/// Sets the project context prepended to every generation prompt.
pub struct ContextSetCommand {
    pub text: String,
}

#[async_trait]
impl Command for ContextSetCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        ctx.config_store().set_context(&self.text).await?;
        println!("Project context set: {}", self.text);
        Ok(())
    }
}

pub struct ContextShowCommand;

#[async_trait]
impl Command for ContextShowCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let context = ctx.config_store().context().await?;
        if context.is_empty() {
            println!("No project context set");
        } else {
            println!("Current project context: {context}");
        }
        Ok(())
    }
}

pub struct ContextClearCommand;

#[async_trait]
impl Command for ContextClearCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        ctx.config_store().set_context("").await?;
        println!("Project context cleared");
        Ok(())
    }
}
