use crate::domain::{Task, TaskFilter, TaskId};

/// A user interaction, with every value it needs already bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Load,
    Add { text: String },
    SetCompleted { id: TaskId, completed: bool },
    Edit { id: TaskId, text: String },
    Delete { id: TaskId },
    ClearCompleted { ids: Vec<TaskId> },
    SetFilter(TaskFilter),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Load => "load",
            Intent::Add { .. } => "add",
            Intent::SetCompleted { .. } => "toggle",
            Intent::Edit { .. } => "edit",
            Intent::Delete { .. } => "delete",
            Intent::ClearCompleted { .. } => "clear-completed",
            Intent::SetFilter(_) => "filter",
        }
    }
}

/// A confirmed state transition, ready to be committed to the task list.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Loaded(Vec<Task>),
    Created(Task),
    Updated(Task),
    Deleted(TaskId),
    Cleared(Vec<TaskId>),
    FilterChanged(TaskFilter),
}
