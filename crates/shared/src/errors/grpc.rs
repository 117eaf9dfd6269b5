use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use thiserror::Error;
use tonic::{
    Code, Status,
    codegen::Bytes,
    metadata::{Ascii, MetadataMap, MetadataValue},
};

pub const STATUS_CODE_METADATA: &str = "x-status-code";

#[derive(Debug, Error)]
pub enum AppErrorGrpc {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
    #[error("Unhandled: {0}")]
    Unhandled(String),
}

impl AppErrorGrpc {
    fn http_status(&self) -> u16 {
        match self {
            AppErrorGrpc::Service(service_err) => service_err.http_status(),
            AppErrorGrpc::Unhandled(_) => 500,
        }
    }
}

impl From<AppErrorGrpc> for Status {
    fn from(err: AppErrorGrpc) -> Self {
        let http_status = err.http_status();
        let mut metadata = MetadataMap::new();
        if let Ok(value) = http_status.to_string().parse::<MetadataValue<Ascii>>() {
            metadata.insert(STATUS_CODE_METADATA, value);
        }

        let (code, message) = match &err {
            AppErrorGrpc::Service(service_err) => match service_err {
                ServiceError::Validation(_) => (Code::InvalidArgument, service_err.to_string()),
                ServiceError::BadRequest(msg) => (Code::InvalidArgument, msg.clone()),
                ServiceError::NotFound(msg) => (Code::NotFound, msg.clone()),

                ServiceError::Repo(repo_err) => match repo_err {
                    RepositoryError::NotFound => (Code::NotFound, "Not found".to_string()),
                    RepositoryError::Conflict(msg) => (Code::AlreadyExists, msg.clone()),
                    RepositoryError::AlreadyExists(msg) => (Code::AlreadyExists, msg.clone()),
                    RepositoryError::ForeignKey(msg) => (
                        Code::FailedPrecondition,
                        format!("Foreign key constraint: {msg}"),
                    ),
                    RepositoryError::Sqlx(_) => (Code::Internal, "Database error".to_string()),
                    RepositoryError::Custom(msg) => (Code::Internal, msg.clone()),
                },

                ServiceError::Internal(msg) => (Code::Internal, msg.clone()),
            },

            AppErrorGrpc::Unhandled(msg) => (Code::Internal, format!("Unhandled error: {msg}")),
        };

        let violations = match &err {
            AppErrorGrpc::Service(ServiceError::Validation(violations)) => violations.clone(),
            _ => Vec::new(),
        };

        // details carry {status, message, violations?} as JSON
        let details = serde_json::to_vec(&ErrorResponse {
            status: http_status,
            message: message.clone(),
            violations,
        })
        .unwrap_or_default();

        Status::with_details_and_metadata(code, message, Bytes::from(details), metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldViolation;

    fn status_of(err: ServiceError) -> Status {
        Status::from(AppErrorGrpc::from(err))
    }

    fn http_code(status: &Status) -> Option<&str> {
        status
            .metadata()
            .get(STATUS_CODE_METADATA)
            .and_then(|v| v.to_str().ok())
    }

    #[test]
    fn not_found_keeps_message_and_404() {
        let status = status_of(ServiceError::NotFound(
            "Product with id 7 not found".into(),
        ));

        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "Product with id 7 not found");
        assert_eq!(http_code(&status), Some("404"));

        let body: serde_json::Value = serde_json::from_slice(status.details()).unwrap();
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "Product with id 7 not found");
        assert!(body.get("violations").is_none());
    }

    #[test]
    fn bad_request_maps_to_invalid_argument_400() {
        let status = status_of(ServiceError::BadRequest("Some products not found".into()));

        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "Some products not found");
        assert_eq!(http_code(&status), Some("400"));
    }

    #[test]
    fn validation_lists_every_field() {
        let status = status_of(ServiceError::Validation(vec![
            FieldViolation::new("name", "length", "name should not be empty"),
            FieldViolation::new("price", "positive", "price must be a positive number"),
        ]));

        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().contains("name: name should not be empty"));
        assert!(status.message().contains("price: price must be a positive number"));
        assert_eq!(http_code(&status), Some("400"));

        let body: ErrorResponse = serde_json::from_slice(status.details()).unwrap();
        assert_eq!(body.status, 400);
        assert_eq!(body.violations.len(), 2);
        assert_eq!(body.violations[1].field, "price");
        assert_eq!(body.violations[1].constraint, "positive");
    }

    #[test]
    fn store_failures_stay_internal() {
        let status = status_of(ServiceError::Repo(RepositoryError::Sqlx(
            sqlx::Error::PoolTimedOut,
        )));

        assert_eq!(status.code(), Code::Internal);
        assert_eq!(http_code(&status), Some("500"));
    }
}
