use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Trait for abstracting file system operations.
/// This trait enables dependency injection and testability.
#[async_trait]
pub trait FileSystemOperations: Send + Sync {
    /// Creates a directory at the specified path, including all parent directories.
    async fn create_dir(&self, path: &Path) -> Result<()>;

    /// Writes content to a file, creating parent directories if needed.
    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Writes a file only the current user can read. Falls back to `write_file`
    /// on platforms without unix permissions.
    async fn write_private_file(&self, path: &Path, content: &str) -> Result<()> {
        self.write_file(path, content).await
    }

    /// Reads the contents of a file as a string.
    async fn read_file(&self, path: &Path) -> Result<String>;

    /// Checks if a path exists (file or directory).
    async fn exists(&self, path: &Path) -> Result<bool>;
}

/// Default implementation of FileSystemOperations using tokio::fs.
pub struct DefaultFileSystem;

impl DefaultFileSystem {
    fn temp_path_for(path: &Path) -> std::path::PathBuf {
        let mut temp = path.to_path_buf();
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let pid = std::process::id();
        temp.set_file_name(format!(
            ".{}.{}.{}.tmp",
            path.file_name().unwrap_or_default().to_string_lossy(),
            pid,
            timestamp
        ));
        temp
    }

    /// Writes `content` to a fresh temp file. A private file is created with
    /// mode 0600 on unix, so the content is never readable by other users.
    async fn write_temp(temp_path: &Path, content: &str, private: bool) -> Result<()> {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            if private {
                options.mode(0o600);
            }
        }
        #[cfg(not(unix))]
        let _ = private;

        let mut file = options.open(temp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn write_atomic(&self, path: &Path, content: &str, private: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir(parent).await?;
            }
        }

        // Readers never observe a half-written file
        let temp_path = Self::temp_path_for(path);
        if let Err(e) = Self::write_temp(&temp_path, content, private).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }

        match tokio::fs::rename(&temp_path, path).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp_path).await;
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl FileSystemOperations for DefaultFileSystem {
    async fn create_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.write_atomic(path, content, false).await
    }

    async fn write_private_file(&self, path: &Path, content: &str) -> Result<()> {
        self.write_atomic(path, content, true).await
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(content)
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await.unwrap_or(false))
    }
}
