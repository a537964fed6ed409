use crate::context::file_system::FileSystemOperations;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory file system that can be told to fail writes to specific paths.
#[derive(Default)]
pub struct MockFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
    dirs: Mutex<Vec<PathBuf>>,
    write_failures: Mutex<HashMap<PathBuf, usize>>,
    writes: Mutex<Vec<PathBuf>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        self
    }

    /// Fail the next `times` writes to `path`
    pub fn fail_writes(self, path: &str, times: usize) -> Self {
        self.write_failures
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), times);
        self
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    /// Every attempted write, including failed ones, in order
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileSystemOperations for MockFileSystem {
    async fn create_dir(&self, path: &Path) -> Result<()> {
        self.dirs.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.writes.lock().unwrap().push(path.to_path_buf());

        let mut failures = self.write_failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(path) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(anyhow!("simulated write failure"));
            }
        }
        drop(failures);

        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.files.lock().unwrap().contains_key(path)
            || self.dirs.lock().unwrap().iter().any(|d| d == path))
    }
}
