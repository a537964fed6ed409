use crate::error::ConfigError;
use std::env;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "code-parallel";

/// Queue file kept in the project directory, shared by every command run there.
pub const QUEUE_FILE_NAME: &str = ".code_parallel_queue.json";
/// Project context file kept next to the queue.
pub const CONTEXT_FILE_NAME: &str = ".code_parallel_context.json";

/// Resolved locations of every file the tool reads or writes.
///
/// Config directory resolution priority (highest to lowest):
/// 1. Builder override (test-only)
/// 2. `CODE_PARALLEL_CONFIG_HOME`
/// 3. `XDG_CONFIG_HOME/code-parallel`
/// 4. `~/.config/code-parallel`
///
/// The project directory is the current working directory unless overridden.
#[derive(Debug, Clone)]
pub struct AppEnv {
    config_dir: PathBuf,
    project_dir: PathBuf,
}

impl AppEnv {
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = Self::resolve_config_dir(None)?;
        let project_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            config_dir,
            project_dir,
        })
    }

    #[cfg(test)]
    pub fn builder() -> AppEnvBuilder {
        AppEnvBuilder::default()
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Global credential file
    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Optional tunables file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    pub fn queue_file(&self) -> PathBuf {
        self.project_dir.join(QUEUE_FILE_NAME)
    }

    pub fn context_file(&self) -> PathBuf {
        self.project_dir.join(CONTEXT_FILE_NAME)
    }

    fn resolve_config_dir(override_dir: Option<&PathBuf>) -> Result<PathBuf, ConfigError> {
        if let Some(config_dir) = override_dir {
            return Ok(config_dir.clone());
        }

        if let Ok(dir) = env::var("CODE_PARALLEL_CONFIG_HOME") {
            return Ok(PathBuf::from(dir));
        }

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config).join(APP_DIR_NAME));
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| ConfigError::NoHomeDirectory)?;

        Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct AppEnvBuilder {
    config_dir: Option<PathBuf>,
    project_dir: Option<PathBuf>,
}

#[cfg(test)]
impl AppEnvBuilder {
    pub fn with_config_dir(mut self, dir: PathBuf) -> Self {
        self.config_dir = Some(dir);
        self
    }

    pub fn with_project_dir(mut self, dir: PathBuf) -> Self {
        self.project_dir = Some(dir);
        self
    }

    pub fn build(self) -> Result<AppEnv, ConfigError> {
        let config_dir = AppEnv::resolve_config_dir(self.config_dir.as_ref())?;
        let project_dir = self
            .project_dir
            .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        Ok(AppEnv {
            config_dir,
            project_dir,
        })
    }
}
