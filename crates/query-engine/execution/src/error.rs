//! Execution failures.

use std::time::Duration;

use thiserror::Error;

/// The synthesized statement failed against the database. The database's
/// own error text is surfaced verbatim; there is no retry and no statement
/// repair.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("unable to connect to the database: {0}")]
    Connect(sqlx::Error),
    #[error("{0}")]
    Database(sqlx::Error),
    #[error("column {column} has unsupported type {type_name}")]
    UnsupportedColumnType { column: String, type_name: String },
    #[error("the statement did not complete within {}s", .0.as_secs())]
    Timeout(Duration),
}
