use crate::errors::{repository::RepositoryError, validation::FieldViolation};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP-style status code for callers that speak HTTP semantics.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::Validation(_) | ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => 404,
                RepositoryError::Conflict(_) | RepositoryError::AlreadyExists(_) => 409,
                RepositoryError::ForeignKey(_) => 400,
                RepositoryError::Sqlx(_) | RepositoryError::Custom(_) => 500,
            },
            ServiceError::Internal(_) => 500,
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(FieldViolation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
