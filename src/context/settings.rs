//! Tunables loaded from `settings.toml`
//!
//! Every field has a default, so a missing file or a partial file is valid.
//! The credential and project context are not part of this file; they are
//! managed by the config store because commands write them.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_FAST_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_QUALITY_MODEL: &str = "gemini-exp-1206";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_WORKERS: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Generation service connection settings
    pub generation: GenerationSettings,
    /// Queue run settings
    pub run: RunSettings,
}

impl Settings {
    /// Loads settings from `path`, returning defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e.into(),
                });
            }
        };

        Self::parse(&contents).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Model used for regular tasks
    pub fast_model: String,
    /// Model used for tasks queued with the high-quality flag
    pub quality_model: String,
    /// API root, without a trailing slash
    pub base_url: String,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            quality_model: DEFAULT_QUALITY_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 300,
        }
    }
}

impl GenerationSettings {
    pub fn model_for(&self, use_high_quality_model: bool) -> &str {
        if use_high_quality_model {
            &self.quality_model
        } else {
            &self.fast_model
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Worker count used when `queue run` gets no `--parallel`
    pub default_workers: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            default_workers: DEFAULT_WORKERS,
        }
    }
}
