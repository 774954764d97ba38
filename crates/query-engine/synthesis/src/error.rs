//! Synthesis and guard failures.

use std::time::Duration;

use thiserror::Error;

/// The model call failed. None of these are retried; each becomes a
/// request-level failure with no cached or previous SQL reused.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("unable to reach the language model: {0}")]
    Transport(reqwest::Error),
    #[error("language model returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("the language model did not reply within {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("invalid language model endpoint: {0}")]
    InvalidEndpoint(url::ParseError),
}

/// The synthesized statement is not a read-only statement and will not be
/// executed.
#[derive(Debug, Error)]
#[error("refusing to execute a non read-only statement (starts with {keyword:?})")]
pub struct ForbiddenStatementError {
    pub keyword: String,
}
