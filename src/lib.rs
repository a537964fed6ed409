pub mod commands;
pub mod context;
pub mod display;
pub mod error;
pub mod executor;
pub mod generation;
pub mod report;
pub mod task;
pub mod task_queue;

#[cfg(test)]
pub mod test_utils;
