use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::Report;
use serde_json::json;

use kernel::KernelError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    fn status(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::NotFound { .. } => StatusCode::NOT_FOUND,
            KernelError::Conflict { .. } => StatusCode::CONFLICT,
            KernelError::Unauthorized => StatusCode::FORBIDDEN,
            KernelError::Validation { .. } => StatusCode::BAD_REQUEST,
            KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("request rejected: {:?}", self.0);
        }
        let body = json!({ "message": self.0.current_context().to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::Report;

    use kernel::{EntityKind, KernelError};

    use super::ErrorStatus;

    fn status_of(error: KernelError) -> StatusCode {
        ErrorStatus::from(Report::new(error)).into_response().status()
    }

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(
            status_of(KernelError::NotFound {
                entity: EntityKind::BorrowingRecord,
                id: 3
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(KernelError::BOOK_ON_LOAN), StatusCode::CONFLICT);
        assert_eq!(status_of(KernelError::Unauthorized), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(KernelError::Validation { field: "bookId" }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(KernelError::Timeout), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            status_of(KernelError::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
