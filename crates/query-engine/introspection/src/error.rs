//! Introspection failures.

use std::time::Duration;

use thiserror::Error;

/// A catalog read failed. There is no partial or degraded schema result;
/// any of these aborts the request.
#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("unable to connect to the database: {0}")]
    Connect(sqlx::Error),
    #[error("catalog query failed: {0}")]
    Catalog(sqlx::Error),
    #[error("introspection did not complete within {}s", .0.as_secs())]
    Timeout(Duration),
}
