use crate::error::AttemptError;
use async_trait::async_trait;
use std::time::Duration;

/// How many times a task is attempted and how long to wait between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Wait after a failed generation call
    pub generation_backoff: Duration,
    /// Wait after a failed output file write
    pub write_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            generation_backoff: Duration::from_secs(2),
            write_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Returns the delay before the next attempt, or `None` when `attempt` was the last one.
    pub fn backoff_after(&self, attempt: u32, error: &AttemptError) -> Option<Duration> {
        if attempt >= self.max_attempts.max(1) {
            return None;
        }
        if error.is_write_failure() {
            Some(self.write_backoff)
        } else {
            Some(self.generation_backoff)
        }
    }
}

/// Source of retry delays. Tests substitute a recording implementation.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
