//! The askdb HTTP service: one endpoint that answers a natural-language
//! question about a PostgreSQL database by synthesizing and executing SQL.

pub mod error;
pub mod logging;
pub mod pipeline;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::state::ServerState;

/// Build the service router. The state is attached as an extension so
/// tests can build a router around any state they like.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/ask", post(routes::ask::ask))
        .route("/health", get(routes::health::health))
        .layer(Extension(state))
}
