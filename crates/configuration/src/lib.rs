//! Startup configuration for the askdb service.

pub mod configuration;
pub mod environment;
pub mod error;
pub mod values;

pub use configuration::{LlmSettings, PhaseTimeouts, ServerConfiguration};
pub use environment::{Environment, FixedEnvironment, ProcessEnvironment, Variable};
pub use error::ConfigurationError;
pub use values::{ApiKey, ConnectionUri};
