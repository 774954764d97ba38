//! Elaborating a runtime configuration from the environment.

use std::time::Duration;

use url::Url;

use crate::environment::{Environment, Variable};
use crate::error::ConfigurationError;
use crate::values::{ApiKey, ConnectionUri};

pub const DATABASE_URL_VARIABLE: Variable = Variable("DATABASE_URL");
pub const LLM_API_KEY_VARIABLE: Variable = Variable("LLM_API_KEY");
pub const LLM_BASE_URL_VARIABLE: Variable = Variable("LLM_BASE_URL");
pub const LLM_MODEL_VARIABLE: Variable = Variable("LLM_MODEL");
pub const PORT_VARIABLE: Variable = Variable("PORT");
pub const INTROSPECTION_TIMEOUT_VARIABLE: Variable = Variable("INTROSPECTION_TIMEOUT_SECS");
pub const SYNTHESIS_TIMEOUT_VARIABLE: Variable = Variable("SYNTHESIS_TIMEOUT_SECS");
pub const EXECUTION_TIMEOUT_VARIABLE: Variable = Variable("EXECUTION_TIMEOUT_SECS");

const DEFAULT_LLM_BASE_URL: &str = "https://api.deepseek.com";
const DEFAULT_LLM_MODEL: &str = "deepseek-chat";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_INTROSPECTION_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the service needs to run, loaded once at process start and
/// immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct ServerConfiguration {
    pub connection_uri: ConnectionUri,
    pub llm: LlmSettings,
    pub timeouts: PhaseTimeouts,
    pub port: u16,
}

/// Settings for the chat-completion collaborator.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: Url,
    pub api_key: ApiKey,
    pub model: String,
}

/// Upper bounds on each external call made while handling a request.
#[derive(Debug, Clone, Copy)]
pub struct PhaseTimeouts {
    pub introspection: Duration,
    pub synthesis: Duration,
    pub execution: Duration,
}

impl Default for PhaseTimeouts {
    fn default() -> Self {
        Self {
            introspection: DEFAULT_INTROSPECTION_TIMEOUT,
            synthesis: DEFAULT_SYNTHESIS_TIMEOUT,
            execution: DEFAULT_EXECUTION_TIMEOUT,
        }
    }
}

impl ServerConfiguration {
    /// Elaborate a configuration from the environment. The database address
    /// and model credential are required; everything else has a default.
    pub fn from_environment(environment: impl Environment) -> Result<Self, ConfigurationError> {
        let connection_uri = ConnectionUri(environment.read(&DATABASE_URL_VARIABLE)?);
        let api_key = ApiKey(environment.read(&LLM_API_KEY_VARIABLE)?);

        let base_url = match environment.read_optional(&LLM_BASE_URL_VARIABLE) {
            Some(raw) => {
                Url::parse(&raw).map_err(|err| ConfigurationError::InvalidValue {
                    variable: LLM_BASE_URL_VARIABLE.0,
                    message: err.to_string(),
                })?
            }
            None => Url::parse(DEFAULT_LLM_BASE_URL)
                .map_err(|err| ConfigurationError::InvalidValue {
                    variable: LLM_BASE_URL_VARIABLE.0,
                    message: err.to_string(),
                })?,
        };

        let model = environment
            .read_optional(&LLM_MODEL_VARIABLE)
            .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());

        let port = match environment.read_optional(&PORT_VARIABLE) {
            Some(raw) => raw.parse().map_err(|_| ConfigurationError::InvalidValue {
                variable: PORT_VARIABLE.0,
                message: format!("expected a port number, got {raw:?}"),
            })?,
            None => DEFAULT_PORT,
        };

        let defaults = PhaseTimeouts::default();
        let timeouts = PhaseTimeouts {
            introspection: read_timeout(
                &environment,
                &INTROSPECTION_TIMEOUT_VARIABLE,
                defaults.introspection,
            )?,
            synthesis: read_timeout(&environment, &SYNTHESIS_TIMEOUT_VARIABLE, defaults.synthesis)?,
            execution: read_timeout(&environment, &EXECUTION_TIMEOUT_VARIABLE, defaults.execution)?,
        };

        Ok(Self {
            connection_uri,
            llm: LlmSettings {
                base_url,
                api_key,
                model,
            },
            timeouts,
            port,
        })
    }
}

fn read_timeout(
    environment: &impl Environment,
    variable: &Variable,
    default: Duration,
) -> Result<Duration, ConfigurationError> {
    match environment.read_optional(variable) {
        Some(raw) => {
            let secs: u64 = raw.parse().map_err(|_| ConfigurationError::InvalidValue {
                variable: variable.0,
                message: format!("expected a number of seconds, got {raw:?}"),
            })?;
            Ok(Duration::from_secs(secs))
        }
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::FixedEnvironment;

    fn minimal_environment() -> FixedEnvironment {
        FixedEnvironment::new([
            (
                DATABASE_URL_VARIABLE,
                "postgresql://localhost:5432/app".to_string(),
            ),
            (LLM_API_KEY_VARIABLE, "sk-test".to_string()),
        ])
    }

    #[test]
    fn elaborates_with_defaults() {
        let configuration = ServerConfiguration::from_environment(minimal_environment()).unwrap();

        assert_eq!(
            configuration.connection_uri.as_str(),
            "postgresql://localhost:5432/app"
        );
        assert_eq!(configuration.llm.base_url.as_str(), "https://api.deepseek.com/");
        assert_eq!(configuration.llm.model, "deepseek-chat");
        assert_eq!(configuration.port, 8000);
        assert_eq!(configuration.timeouts.synthesis, Duration::from_secs(60));
    }

    #[test]
    fn missing_database_url_is_fatal() {
        let environment =
            FixedEnvironment::new([(LLM_API_KEY_VARIABLE, "sk-test".to_string())]);

        let result = ServerConfiguration::from_environment(environment);
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingVariable(_))
        ));
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let environment = FixedEnvironment::new([(
            DATABASE_URL_VARIABLE,
            "postgresql://localhost:5432/app".to_string(),
        )]);

        assert!(ServerConfiguration::from_environment(environment).is_err());
    }

    #[test]
    fn overrides_are_honored() {
        let environment = FixedEnvironment::new([
            (
                DATABASE_URL_VARIABLE,
                "postgresql://localhost:5432/app".to_string(),
            ),
            (LLM_API_KEY_VARIABLE, "sk-test".to_string()),
            (LLM_BASE_URL_VARIABLE, "https://llm.internal:8443".to_string()),
            (LLM_MODEL_VARIABLE, "sql-coder".to_string()),
            (PORT_VARIABLE, "9090".to_string()),
            (SYNTHESIS_TIMEOUT_VARIABLE, "5".to_string()),
        ]);

        let configuration = ServerConfiguration::from_environment(environment).unwrap();
        assert_eq!(configuration.llm.model, "sql-coder");
        assert_eq!(configuration.port, 9090);
        assert_eq!(configuration.timeouts.synthesis, Duration::from_secs(5));
        assert_eq!(
            configuration.timeouts.execution,
            PhaseTimeouts::default().execution
        );
    }

    #[test]
    fn rejects_unparseable_port() {
        let environment = FixedEnvironment::new([
            (
                DATABASE_URL_VARIABLE,
                "postgresql://localhost:5432/app".to_string(),
            ),
            (LLM_API_KEY_VARIABLE, "sk-test".to_string()),
            (PORT_VARIABLE, "not-a-port".to_string()),
        ]);

        assert!(matches!(
            ServerConfiguration::from_environment(environment),
            Err(ConfigurationError::InvalidValue { variable: "PORT", .. })
        ));
    }
}
