//! Local task store — tasks entered through the form during one session.
//!
//! The store is owned by whoever drives the session; there is no global
//! instance. It only grows: tasks are appended and never updated or removed.

use crate::task::Task;

/// Append-only, ordered list of form-entered tasks.
#[derive(Debug, Clone, Default)]
pub struct LocalTaskStore {
    tasks: Vec<Task>,
}

impl LocalTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task and returns a reference to the stored copy.
    pub fn add(&mut self, task: Task) -> &Task {
        tracing::debug!(id = task.id.as_deref(), title = %task.title, "added local task");
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    /// Returns the stored tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of stored tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
