//! The request pipeline: introspect, prompt, synthesize, guard, execute,
//! render. Each request runs the phases sequentially on fresh state; the
//! schema travels through as an explicit argument and is discarded with
//! the request.

use async_trait::async_trait;
use query_engine_execution::{execute_statement, render_answer};
use query_engine_introspection::introspect_schema;
use query_engine_synthesis::{
    classify_reply, ensure_read_only, system_instruction, LlmClient, SynthesisError,
    SynthesizedSql,
};
use tracing::{info_span, Instrument};

use crate::error::RequestError;
use crate::state::ServerState;

/// The terminal outcome of a successful request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The model declined; its reply is the answer, and nothing was
    /// executed.
    Unanswerable(String),
    /// The statement ran; the answer is the SQL paired with the rendered
    /// table.
    Rendered(String),
}

impl Answer {
    pub fn into_text(self) -> String {
        match self {
            Answer::Unanswerable(reply) | Answer::Rendered(reply) => reply,
        }
    }
}

/// Anything that can turn an instruction and a question into a raw reply.
/// `LlmClient` is the production implementation; tests substitute canned
/// replies to exercise the guard without the network.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, instruction: &str, question: &str)
        -> Result<String, SynthesisError>;
}

#[async_trait]
impl Synthesizer for LlmClient {
    async fn synthesize(
        &self,
        instruction: &str,
        question: &str,
    ) -> Result<String, SynthesisError> {
        LlmClient::synthesize(self, instruction, question).await
    }
}

/// Answer one question end to end.
pub async fn answer_question(
    state: &ServerState,
    question: &str,
) -> Result<Answer, RequestError> {
    let configuration = &state.configuration;

    // Fresh introspection on every request; no cache to go stale.
    let schema = introspect_schema(
        &configuration.connection_uri,
        configuration.timeouts.introspection,
    )
    .await?;

    let instruction = system_instruction(&schema);

    synthesize_and_execute(state, &state.llm, &instruction, question).await
}

/// The post-introspection half of the pipeline. Split out so the guard's
/// short-circuit behavior is testable with a canned synthesizer.
async fn synthesize_and_execute(
    state: &ServerState,
    synthesizer: &dyn Synthesizer,
    instruction: &str,
    question: &str,
) -> Result<Answer, RequestError> {
    let reply = synthesizer
        .synthesize(instruction, question)
        .instrument(info_span!("synthesize"))
        .await?;

    match classify_reply(&reply) {
        SynthesizedSql::Unanswerable => {
            tracing::info!("question classified as unanswerable");
            Ok(Answer::Unanswerable(reply))
        }
        SynthesizedSql::Statement(sql) => {
            ensure_read_only(&sql)?;

            let configuration = &state.configuration;
            let result = execute_statement(
                &configuration.connection_uri,
                &sql,
                configuration.timeouts.execution,
            )
            .await?;

            Ok(Answer::Rendered(render_answer(&sql, &result)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_state;
    use askdb_configuration::{
        ApiKey, ConnectionUri, LlmSettings, PhaseTimeouts, ServerConfiguration,
    };

    struct CannedSynthesizer(&'static str);

    #[async_trait]
    impl Synthesizer for CannedSynthesizer {
        async fn synthesize(
            &self,
            _instruction: &str,
            _question: &str,
        ) -> Result<String, SynthesisError> {
            Ok(self.0.to_string())
        }
    }

    // The connection URI points nowhere, so any test that reaches the
    // executor would fail with a connection error rather than pass.
    fn disconnected_state() -> ServerState {
        let configuration = ServerConfiguration {
            connection_uri: ConnectionUri::from("postgresql://localhost:1/nowhere"),
            llm: LlmSettings {
                base_url: url::Url::parse("https://api.deepseek.com").unwrap(),
                api_key: ApiKey::from("sk-test"),
                model: "deepseek-chat".to_string(),
            },
            timeouts: PhaseTimeouts::default(),
            port: 0,
        };
        create_state(configuration).unwrap()
    }

    #[tokio::test]
    async fn sentinel_reply_never_reaches_the_executor() {
        let state = disconnected_state();
        let answer = synthesize_and_execute(
            &state,
            &CannedSynthesizer("UNANSWERABLE"),
            "instruction",
            "what is the meaning of life",
        )
        .await
        .unwrap();

        assert_eq!(answer, Answer::Unanswerable("UNANSWERABLE".to_string()));
    }

    #[tokio::test]
    async fn forbidden_statement_is_refused_before_execution() {
        let state = disconnected_state();
        let result = synthesize_and_execute(
            &state,
            &CannedSynthesizer("DROP TABLE users"),
            "instruction",
            "remove the users table",
        )
        .await;

        assert!(matches!(result, Err(RequestError::Forbidden(_))));
    }

    #[tokio::test]
    async fn select_reaches_the_executor_and_surfaces_its_failure() {
        let state = disconnected_state();
        let result = synthesize_and_execute(
            &state,
            &CannedSynthesizer("SELECT * FROM users"),
            "instruction",
            "list users",
        )
        .await;

        // The URI is unreachable, so the pipeline must report an execution
        // failure rather than anything earlier in the chain.
        assert!(matches!(result, Err(RequestError::Execution(_))));
    }
}
