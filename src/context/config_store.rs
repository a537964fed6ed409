use crate::context::file_system::FileSystemOperations;
use crate::error::ConfigError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Persisted user configuration read by the executor and written by commands.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// API credential for the generation service. Empty when unset.
    async fn credential(&self) -> Result<String, ConfigError>;

    async fn set_credential(&self, credential: &str) -> Result<(), ConfigError>;

    /// Free-form project context added to every prompt. Empty when unset.
    async fn context(&self) -> Result<String, ConfigError>;

    async fn set_context(&self, context: &str) -> Result<(), ConfigError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    api_key: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ContextFile {
    #[serde(default)]
    context: String,
}

/// Stores the credential in a global JSON file and the context in a project-local one.
pub struct JsonConfigStore {
    credentials_path: PathBuf,
    context_path: PathBuf,
    file_system: Arc<dyn FileSystemOperations>,
}

impl JsonConfigStore {
    pub fn new(
        credentials_path: PathBuf,
        context_path: PathBuf,
        file_system: Arc<dyn FileSystemOperations>,
    ) -> Self {
        Self {
            credentials_path,
            context_path,
            file_system,
        }
    }

    async fn read_json<T>(&self, path: &Path) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        let exists = self
            .file_system
            .exists(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if !exists {
            return Ok(T::default());
        }

        let contents =
            self.file_system
                .read_file(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
        if contents.trim().is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn to_json<T: Serialize>(path: &Path, value: &T) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(value).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn credential(&self) -> Result<String, ConfigError> {
        let file: CredentialsFile = self.read_json(&self.credentials_path).await?;
        Ok(file.api_key.trim().to_string())
    }

    async fn set_credential(&self, credential: &str) -> Result<(), ConfigError> {
        let file = CredentialsFile {
            api_key: credential.trim().to_string(),
        };
        let contents = Self::to_json(&self.credentials_path, &file)?;
        self.file_system
            .write_private_file(&self.credentials_path, &contents)
            .await
            .map_err(|source| ConfigError::Write {
                path: self.credentials_path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.credentials_path.display(), "credential saved");
        Ok(())
    }

    async fn context(&self) -> Result<String, ConfigError> {
        let file: ContextFile = self.read_json(&self.context_path).await?;
        Ok(file.context)
    }

    async fn set_context(&self, context: &str) -> Result<(), ConfigError> {
        let file = ContextFile {
            context: context.to_string(),
        };
        let contents = Self::to_json(&self.context_path, &file)?;
        self.file_system
            .write_file(&self.context_path, &contents)
            .await
            .map_err(|source| ConfigError::Write {
                path: self.context_path.clone(),
                source,
            })
    }
}
