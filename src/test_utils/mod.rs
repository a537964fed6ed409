//! Test utilities
//!
//! Mock collaborators for the executor and commands:
//! - Generation (ScriptedGenerationService, StaticGenerationFactory)
//! - File system (MockFileSystem)
//! - Configuration (MemoryConfigStore) and retry clock (RecordingSleeper)

pub mod file_systems;
pub mod generation_services;

pub use file_systems::MockFileSystem;
pub use generation_services::{GenerateCall, ScriptedGenerationService, StaticGenerationFactory};

use crate::context::config_store::ConfigStore;
use crate::error::ConfigError;
use crate::executor::Sleeper;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Config store kept in memory
pub struct MemoryConfigStore {
    credential: Mutex<String>,
    context: Mutex<String>,
}

impl MemoryConfigStore {
    pub fn new(credential: &str, context: &str) -> Self {
        Self {
            credential: Mutex::new(credential.to_string()),
            context: Mutex::new(context.to_string()),
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn credential(&self) -> Result<String, ConfigError> {
        Ok(self.credential.lock().unwrap().clone())
    }

    async fn set_credential(&self, credential: &str) -> Result<(), ConfigError> {
        *self.credential.lock().unwrap() = credential.to_string();
        Ok(())
    }

    async fn context(&self) -> Result<String, ConfigError> {
        Ok(self.context.lock().unwrap().clone())
    }

    async fn set_context(&self, context: &str) -> Result<(), ConfigError> {
        *self.context.lock().unwrap() = context.to_string();
        Ok(())
    }
}

/// Sleeper that returns immediately and remembers every requested delay
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
