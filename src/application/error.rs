use crate::domain::DomainError;
use crate::ports::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] TransportError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Application error: {0}")]
    Application(String),
}

pub type AppResult<T> = Result<T, AppError>;
