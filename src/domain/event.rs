use super::{Task, TaskId};

/// State transitions that decorative effects react to.
///
/// Emitted only after the store confirmed the transition. Nothing in the
/// core waits on, or reads back from, whoever consumes these.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Created(Task),
    Completed(Task),
    Deleted(TaskId),
    ClearedCompleted { count: usize },
}
