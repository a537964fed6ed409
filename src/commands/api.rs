use super::Command;
use crate::context::AppContext;
use async_trait::async_trait;
use std::error::Error;

/// Stores the generation service API key in the global config file.
pub struct ApiSetCommand {
    pub key: String,
}

#[async_trait]
impl Command for ApiSetCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        if self.key.trim().is_empty() {
            return Err("API key must not be empty".into());
        }
        ctx.config_store().set_credential(&self.key).await?;
        println!("API key set successfully");
        Ok(())
    }
}
