pub mod app_env;
pub mod config_store;
pub mod file_system;
pub mod settings;

use crate::error::ConfigError;
use crate::executor::{Sleeper, TokioSleeper};
use crate::generation::{GeminiServiceFactory, GenerationServiceFactory};
use crate::task_queue::{JsonTaskQueue, TaskQueue};
use app_env::AppEnv;
use config_store::{ConfigStore, JsonConfigStore};
use file_system::FileSystemOperations;
use settings::Settings;

use std::sync::Arc;

/// Collaborators shared by every command.
#[derive(Clone)]
pub struct AppContext {
    config_store: Arc<dyn ConfigStore>,
    file_system: Arc<dyn FileSystemOperations>,
    generation_factory: Arc<dyn GenerationServiceFactory>,
    settings: Arc<Settings>,
    sleeper: Arc<dyn Sleeper>,
    task_queue: Arc<dyn TaskQueue>,
}

impl AppContext {
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }

    pub fn config_store(&self) -> Arc<dyn ConfigStore> {
        Arc::clone(&self.config_store)
    }

    pub fn file_system(&self) -> Arc<dyn FileSystemOperations> {
        Arc::clone(&self.file_system)
    }

    pub fn generation_factory(&self) -> Arc<dyn GenerationServiceFactory> {
        Arc::clone(&self.generation_factory)
    }

    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings)
    }

    /// Clock used for retry backoff
    pub fn sleeper(&self) -> Arc<dyn Sleeper> {
        Arc::clone(&self.sleeper)
    }

    pub fn task_queue(&self) -> Arc<dyn TaskQueue> {
        Arc::clone(&self.task_queue)
    }
}

#[derive(Default)]
pub struct AppContextBuilder {
    app_env: Option<Arc<AppEnv>>,
    config_store: Option<Arc<dyn ConfigStore>>,
    file_system: Option<Arc<dyn FileSystemOperations>>,
    generation_factory: Option<Arc<dyn GenerationServiceFactory>>,
    settings: Option<Arc<Settings>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    task_queue: Option<Arc<dyn TaskQueue>>,
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_env(mut self, app_env: Arc<AppEnv>) -> Self {
        self.app_env = Some(app_env);
        self
    }

    pub fn with_config_store(mut self, config_store: Arc<dyn ConfigStore>) -> Self {
        self.config_store = Some(config_store);
        self
    }

    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystemOperations>) -> Self {
        self.file_system = Some(file_system);
        self
    }

    pub fn with_generation_factory(
        mut self,
        generation_factory: Arc<dyn GenerationServiceFactory>,
    ) -> Self {
        self.generation_factory = Some(generation_factory);
        self
    }

    pub fn with_settings(mut self, settings: Arc<Settings>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn with_task_queue(mut self, task_queue: Arc<dyn TaskQueue>) -> Self {
        self.task_queue = Some(task_queue);
        self
    }

    /// Fills every collaborator that was not provided with its default implementation.
    pub fn build(self) -> Result<AppContext, ConfigError> {
        let app_env = match self.app_env {
            Some(app_env) => app_env,
            None => Arc::new(Self::default_app_env()?),
        };

        let settings = match self.settings {
            Some(settings) => settings,
            None => Arc::new(Settings::load(&app_env.settings_file())?),
        };

        let file_system = self
            .file_system
            .unwrap_or_else(|| Arc::new(file_system::DefaultFileSystem));

        let config_store = self.config_store.unwrap_or_else(|| {
            Arc::new(JsonConfigStore::new(
                app_env.credentials_file(),
                app_env.context_file(),
                Arc::clone(&file_system),
            ))
        });

        let task_queue = self.task_queue.unwrap_or_else(|| {
            Arc::new(JsonTaskQueue::new(
                app_env.queue_file(),
                Arc::clone(&file_system),
            ))
        });

        let generation_factory = self.generation_factory.unwrap_or_else(|| {
            Arc::new(GeminiServiceFactory::new(settings.generation.clone()))
        });

        Ok(AppContext {
            config_store,
            file_system,
            generation_factory,
            settings,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            task_queue,
        })
    }

    #[cfg(not(test))]
    fn default_app_env() -> Result<AppEnv, ConfigError> {
        AppEnv::new()
    }

    // Tests never touch the real config or working directory
    #[cfg(test)]
    fn default_app_env() -> Result<AppEnv, ConfigError> {
        let root = std::env::temp_dir().join(format!("code-parallel-test-{}", nanoid::nanoid!(10)));
        AppEnv::builder()
            .with_config_dir(root.join("config"))
            .with_project_dir(root.join("project"))
            .build()
    }
}
