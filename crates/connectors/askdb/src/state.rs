//! Transient state used by the service.
//!
//! This is initialized on startup. Per-request database connections are
//! opened by the pipeline itself; the state only carries the immutable
//! configuration and the model client.

use std::sync::Arc;

use askdb_configuration::{ConfigurationError, ServerConfiguration};
use query_engine_synthesis::{LlmClient, SynthesisError};
use thiserror::Error;

/// State for the service.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub configuration: Arc<ServerConfiguration>,
    pub llm: LlmClient,
}

/// Build the model client and wrap it together with the configuration.
pub fn create_state(configuration: ServerConfiguration) -> Result<ServerState, InitializationError> {
    let llm = LlmClient::new(&configuration.llm, configuration.timeouts.synthesis)
        .map_err(InitializationError::LlmClient)?;

    Ok(ServerState {
        configuration: Arc::new(configuration),
        llm,
    })
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
    #[error("unable to initialize the language model client: {0}")]
    LlmClient(SynthesisError),
}
