use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Task text cannot be empty")]
    EmptyText,

    #[error("Unknown filter: {0} (expected all, active or completed)")]
    UnknownFilter(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
