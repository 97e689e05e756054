use crate::domain::{Task, TaskId, TaskPatch};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Setup,
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            StoreOperation::Setup => "set up HTTP client",
            StoreOperation::List => "list todos",
            StoreOperation::Create => "create todo",
            StoreOperation::Update => "update todo",
            StoreOperation::Delete => "delete todo",
        };
        write!(f, "{what}")
    }
}

/// The one failure kind of the task store.
///
/// Connection failures, non-2xx statuses and undecodable bodies all land
/// here; callers never branch on the cause.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to {operation}: {reason}")]
pub struct TransportError {
    pub operation: StoreOperation,
    pub status: Option<u16>,
    pub reason: String,
}

impl TransportError {
    pub fn new(operation: StoreOperation, reason: impl Into<String>) -> Self {
        Self {
            operation,
            status: None,
            reason: reason.into(),
        }
    }

    pub fn with_status(operation: StoreOperation, status: u16, reason: impl Into<String>) -> Self {
        Self {
            operation,
            status: Some(status),
            reason: reason.into(),
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> TransportResult<Vec<Task>>;
    async fn create(&self, text: &str) -> TransportResult<Task>;
    async fn patch(&self, id: &TaskId, patch: &TaskPatch) -> TransportResult<Task>;
    async fn delete(&self, id: &TaskId) -> TransportResult<()>;
}
