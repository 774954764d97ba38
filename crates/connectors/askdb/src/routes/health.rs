//! Health check endpoint for the service.

use axum::http::StatusCode;
use axum::Extension;
use query_engine_execution::execute_statement;

use crate::state::ServerState;

/// Check that the service can reach its database. The model endpoint is
/// deliberately not probed; a health poll should not spend tokens.
pub async fn health(Extension(state): Extension<ServerState>) -> StatusCode {
    let configuration = &state.configuration;

    match execute_statement(
        &configuration.connection_uri,
        "SELECT 1 AS alive",
        configuration.timeouts.execution,
    )
    .await
    {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
