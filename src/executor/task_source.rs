use crate::task::Task;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared, claim-once view over the tasks of one run.
///
/// Workers call [`TaskSource::claim`] until it returns `None`. Each index is
/// handed out exactly once, in input order.
pub struct TaskSource {
    tasks: Vec<Arc<Task>>,
    next: AtomicUsize,
}

impl TaskSource {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into_iter().map(Arc::new).collect(),
            next: AtomicUsize::new(0),
        }
    }

    /// Claims the next unclaimed task along with its input position.
    pub fn claim(&self) -> Option<(usize, Arc<Task>)> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.tasks.get(index).map(|task| (index, Arc::clone(task)))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Arc<Task>> {
        self.tasks.get(index).cloned()
    }
}
