//! The chat-completion client.
//!
//! One non-streaming call per request, no retries, no backoff. Transport
//! and API errors propagate to the caller as request-level failures.

use std::time::Duration;

use askdb_configuration::LlmSettings;
use serde_derive::{Deserialize, Serialize};
use tracing::{info_span, Instrument};
use url::Url;

use crate::error::SynthesisError;

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
    timeout: Duration,
}

// The key never appears in Debug output.
impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl LlmClient {
    pub fn new(settings: &LlmSettings, timeout: Duration) -> Result<Self, SynthesisError> {
        // Url::join resolves against the base's last path segment, so a
        // base like `https://host/v1` must gain a trailing slash or the
        // `/v1` is lost from the endpoint.
        let mut base = settings.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("chat/completions")
            .map_err(SynthesisError::InvalidEndpoint)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SynthesisError::Transport)?;

        Ok(Self {
            http,
            endpoint,
            api_key: settings.api_key.as_str().to_string(),
            model: settings.model.clone(),
            timeout,
        })
    }

    /// Send the system instruction and the user question as a two-message
    /// exchange and return the model's reply verbatim, with an empty string
    /// in place of an absent reply.
    pub async fn synthesize(
        &self,
        instruction: &str,
        question: &str,
    ) -> Result<String, SynthesisError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instruction,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            stream: false,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .instrument(info_span!("synthesize_sql", model = %self.model))
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    SynthesisError::Timeout(self.timeout)
                } else {
                    SynthesisError::Transport(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Api { status, body });
        }

        let completion: ChatResponse = response.json().await.map_err(SynthesisError::Transport)?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        tracing::debug!(reply_len = reply.len(), "received completion");

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_configuration::ApiKey;

    fn settings() -> LlmSettings {
        LlmSettings {
            base_url: Url::parse("https://api.deepseek.com").unwrap(),
            api_key: ApiKey::from("sk-test"),
            model: "deepseek-chat".to_string(),
        }
    }

    #[test]
    fn endpoint_is_joined_onto_the_base_url() {
        let client = LlmClient::new(&settings(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://api.deepseek.com/chat/completions"
        );
    }

    #[test]
    fn path_bearing_base_url_keeps_its_path() {
        for base in ["https://api.openai.com/v1", "https://api.openai.com/v1/"] {
            let settings = LlmSettings {
                base_url: Url::parse(base).unwrap(),
                api_key: ApiKey::from("sk-test"),
                model: "gpt-4o-mini".to_string(),
            };
            let client = LlmClient::new(&settings, Duration::from_secs(5)).unwrap();
            assert_eq!(
                client.endpoint.as_str(),
                "https://api.openai.com/v1/chat/completions",
                "base: {base}"
            );
        }
    }

    #[test]
    fn request_body_is_a_two_message_exchange() {
        let request = ChatRequest {
            model: "deepseek-chat",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "instruction",
                },
                ChatMessage {
                    role: "user",
                    content: "question",
                },
            ],
            stream: false,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["stream"], serde_json::json!(false));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "question");
    }

    #[test]
    fn absent_content_deserializes_to_none() {
        let raw = r#"{"choices":[{"message":{"role":"assistant"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
