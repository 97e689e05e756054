use super::Change;
use crate::domain::{Task, TaskFilter, TaskId};

/// Local mirror of the server's task list plus the active filter.
///
/// Order is server order, except that freshly created tasks go to the front
/// until the next reload.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    filter: TaskFilter,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            filter: TaskFilter::All,
        }
    }

    #[cfg(test)]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[cfg(test)]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Replace the entry with the same id. Unknown ids are ignored.
    pub fn apply(&mut self, updated: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated;
        } else {
            tracing::debug!("Ignoring update for unknown task {}", updated.id);
        }
    }

    pub fn remove(&mut self, id: &TaskId) {
        self.tasks.retain(|t| &t.id != id);
    }

    pub fn prepend(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Incomplete tasks across the whole list, whatever the filter.
    pub fn count_remaining(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id.clone())
            .collect()
    }

    pub fn commit(&mut self, change: Change) {
        match change {
            Change::Loaded(tasks) => self.replace_all(tasks),
            Change::Created(task) => self.prepend(task),
            Change::Updated(task) => self.apply(task),
            Change::Deleted(id) => self.remove(&id),
            Change::Cleared(ids) => self.tasks.retain(|t| !ids.contains(&t.id)),
            Change::FilterChanged(filter) => self.set_filter(filter),
        }
    }
}
