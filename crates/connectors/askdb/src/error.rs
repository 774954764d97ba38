//! Mapping pipeline failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use query_engine_execution::ExecutionError;
use query_engine_introspection::IntrospectionError;
use query_engine_synthesis::{ForbiddenStatementError, SynthesisError};
use thiserror::Error;

/// A request-level failure. Every phase failure maps to exactly one of
/// these; nothing is retried or silently degraded.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Forbidden(#[from] ForbiddenStatementError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl RequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            // The statement was synthesized but refused; the caller can
            // rephrase, so this is their error rather than ours.
            RequestError::Forbidden(_) => StatusCode::BAD_REQUEST,
            RequestError::Introspection(_)
            | RequestError::Synthesis(_)
            | RequestError::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();
        tracing::error!(%status, error = %detail, "request failed");
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_statements_are_the_callers_fault() {
        let error = RequestError::from(ForbiddenStatementError {
            keyword: "DROP".to_string(),
        });
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_failures_are_server_errors() {
        let error = RequestError::from(IntrospectionError::Timeout(
            std::time::Duration::from_secs(10),
        ));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn detail_carries_the_underlying_message() {
        let error = RequestError::from(ForbiddenStatementError {
            keyword: "DELETE".to_string(),
        });
        assert!(error.to_string().contains("DELETE"));
    }
}
