use crate::context::file_system::FileSystemOperations;
use crate::error::StorageError;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Trait for the persisted task queue.
///
/// The queue is an ordered list; `load_tasks` returns tasks in enqueue order
/// and `clear_tasks` empties the whole queue at once.
#[async_trait::async_trait]
pub trait TaskQueue: Send + Sync {
    async fn add_task(&self, task: Task) -> Result<(), StorageError>;
    async fn load_tasks(&self) -> Result<Vec<Task>, StorageError>;
    async fn clear_tasks(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct QueueFile {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// JSON file-based implementation
pub struct JsonTaskQueue {
    file_path: PathBuf,
    file_system: Arc<dyn FileSystemOperations>,
    lock: Mutex<()>,
}

impl JsonTaskQueue {
    pub fn new(file_path: PathBuf, file_system: Arc<dyn FileSystemOperations>) -> Self {
        Self {
            file_path,
            file_system,
            lock: Mutex::new(()),
        }
    }

    async fn read_queue(&self) -> Result<QueueFile, StorageError> {
        let exists = self
            .file_system
            .exists(&self.file_path)
            .await
            .map_err(|source| StorageError::Read {
                path: self.file_path.clone(),
                source,
            })?;
        if !exists {
            return Ok(QueueFile::default());
        }

        let contents = self
            .file_system
            .read_file(&self.file_path)
            .await
            .map_err(|source| StorageError::Read {
                path: self.file_path.clone(),
                source,
            })?;
        if contents.trim().is_empty() {
            return Ok(QueueFile::default());
        }

        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.file_path.clone(),
            source,
        })
    }

    async fn write_queue(&self, queue: &QueueFile) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(queue).map_err(|e| StorageError::Write {
            path: self.file_path.clone(),
            source: e.into(),
        })?;
        self.file_system
            .write_file(&self.file_path, &contents)
            .await
            .map_err(|source| StorageError::Write {
                path: self.file_path.clone(),
                source,
            })
    }
}

#[async_trait::async_trait]
impl TaskQueue for JsonTaskQueue {
    async fn add_task(&self, task: Task) -> Result<(), StorageError> {
        let _lock = self.lock.lock().await;

        let mut queue = self.read_queue().await?;
        queue.tasks.push(task);
        self.write_queue(&queue).await
    }

    async fn load_tasks(&self) -> Result<Vec<Task>, StorageError> {
        let _lock = self.lock.lock().await;

        let queue = self.read_queue().await?;
        for task in &queue.tasks {
            task.validate().map_err(|reason| StorageError::InvalidTask {
                id: task.id.clone(),
                reason,
            })?;
        }
        Ok(queue.tasks)
    }

    async fn clear_tasks(&self) -> Result<(), StorageError> {
        let _lock = self.lock.lock().await;

        self.write_queue(&QueueFile::default()).await?;
        tracing::debug!(path = %self.file_path.display(), "task queue cleared");
        Ok(())
    }
}
