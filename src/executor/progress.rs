use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Advisory notifications emitted while a run is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    WorkerStarted {
        worker_id: usize,
        task_id: String,
        description: String,
    },
    Retrying {
        worker_id: usize,
        task_id: String,
        description: String,
        attempt: u32,
        delay: Duration,
        reason: String,
    },
    TaskCompleted {
        worker_id: usize,
        task_id: String,
        description: String,
    },
    TaskFailed {
        worker_id: usize,
        task_id: String,
        description: String,
        error: String,
    },
}

/// Best-effort sender for progress events.
///
/// Events are dropped when the channel is full or the receiver is gone; the
/// executor never waits on a slow consumer.
#[derive(Clone, Default)]
pub struct ProgressSender {
    tx: Option<mpsc::Sender<ProgressEvent>>,
}

impl ProgressSender {
    pub fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: ProgressEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::trace!(?event, "progress channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(n: usize) -> ProgressEvent {
        ProgressEvent::WorkerStarted {
            worker_id: 1,
            task_id: format!("t{n}"),
            description: "d".to_string(),
        }
    }

    #[tokio::test]
    async fn test_full_channel_drops_instead_of_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let sender = ProgressSender::new(tx);

        sender.emit(started(1));
        sender.emit(started(2));

        assert_eq!(rx.recv().await, Some(started(1)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_and_disabled_senders_are_noops() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        ProgressSender::new(tx).emit(started(1));
        ProgressSender::disabled().emit(started(2));
    }
}
