use crate::context::AppContext;
use async_trait::async_trait;
use std::error::Error;

pub mod add;
pub mod api;
pub mod clear;
pub mod context;
pub mod list;
pub mod run;

pub use add::AddCommand;
pub use api::ApiSetCommand;
pub use clear::ClearCommand;
pub use context::{ContextClearCommand, ContextSetCommand, ContextShowCommand};
pub use list::ListCommand;
pub use run::RunCommand;

#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>>;
}
