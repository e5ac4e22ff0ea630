use thiserror::Error;

pub mod listing;
pub mod session;

/// Failures the route layer turns into a flash message and a redirect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("session error: {0}")]
    Session(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
