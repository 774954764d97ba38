//! An abstraction over the environment variables the service reads at
//! startup, so configuration can be elaborated against a fixed map in tests.

use std::collections::HashMap;

/// The name of an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable(pub &'static str);

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Variable(name) = self;
        write!(f, "{name}")
    }
}

/// A source of environment variables.
pub trait Environment {
    /// Read a variable, or report that it is absent.
    fn read(&self, variable: &Variable) -> Result<String, EnvironmentError>;

    /// Read a variable that may legitimately be unset.
    fn read_optional(&self, variable: &Variable) -> Option<String> {
        self.read(variable).ok()
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn read(&self, variable: &Variable) -> Result<String, EnvironmentError> {
        let Variable(name) = variable;
        std::env::var(name).map_err(|_| EnvironmentError::VariableNotPresent(variable.clone()))
    }
}

/// A fixed set of variables, for tests.
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironment(HashMap<Variable, String>);

impl FixedEnvironment {
    pub fn new(variables: impl IntoIterator<Item = (Variable, String)>) -> Self {
        Self(variables.into_iter().collect())
    }
}

impl Environment for FixedEnvironment {
    fn read(&self, variable: &Variable) -> Result<String, EnvironmentError> {
        let FixedEnvironment(variables) = self;
        variables
            .get(variable)
            .cloned()
            .ok_or_else(|| EnvironmentError::VariableNotPresent(variable.clone()))
    }
}

/// Errors reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("the environment variable {0} is not set")]
    VariableNotPresent(Variable),
}
