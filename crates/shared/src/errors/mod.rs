mod error;
mod grpc;
mod repository;
mod service;
mod validation;

pub use self::error::ErrorResponse;
pub use self::grpc::{AppErrorGrpc, STATUS_CODE_METADATA};
pub use self::repository::RepositoryError;
pub use self::service::ServiceError;
pub use self::validation::{FieldViolation, collect_violations};

