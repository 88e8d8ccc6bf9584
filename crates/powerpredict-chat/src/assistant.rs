//! Optional LLM fallback for free-form questions.
//!
//! The rule-based advisor answers everything offline. When an assistant is
//! configured, users can also route a question to an OpenAI-compatible
//! chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use powerpredict_core::config::AssistantConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ChatError;

/// Shown to the user whenever the fallback fails.
pub const UNAVAILABLE_MESSAGE: &str =
    "Sorry, the energy assistant is unavailable right now. Please try again later.";

/// A service that turns one user message into one reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, message: &str) -> Result<String, ChatError>;
}

/// Ask the service and swallow failures into [`UNAVAILABLE_MESSAGE`].
pub async fn ask_or_apologize(service: &dyn CompletionService, message: &str) -> String {
    match service.complete(message).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "Assistant request failed");
            UNAVAILABLE_MESSAGE.to_string()
        }
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn build_request<'a>(model: &'a str, message: &'a str) -> CompletionRequest<'a> {
    CompletionRequest {
        model,
        messages: vec![RequestMessage {
            role: "user",
            content: message,
        }],
    }
}

fn parse_reply(body: &str) -> Result<String, ChatError> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| ChatError::AssistantUnavailable(format!("malformed response: {e}")))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ChatError::AssistantUnavailable("response contained no reply".to_string()))
}

// ============================================================================
// OpenAI-compatible client
// ============================================================================

/// Chat-completions client for OpenAI and compatible servers.
pub struct OpenAiAssistant {
    client: Client,
    config: AssistantConfig,
    api_key: String,
}

impl OpenAiAssistant {
    pub fn new(config: AssistantConfig, api_key: impl Into<String>) -> Result<Self, ChatError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::Configuration(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Build from config, reading the API key from the configured env var.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, ChatError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ChatError::Configuration(format!(
                    "environment variable {} is not set",
                    config.api_key_env
                ))
            })?;
        Self::new(config.clone(), api_key)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionService for OpenAiAssistant {
    async fn complete(&self, message: &str) -> Result<String, ChatError> {
        let request = build_request(&self.config.model, message);

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.config.api_url, error = %e, "Assistant request failed to send");
                ChatError::AssistantUnavailable(format!("request failed: {e}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::AssistantUnavailable(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            warn!(%status, "Assistant returned an error status");
            return Err(ChatError::AssistantUnavailable(format!("upstream returned {status}")));
        }

        let reply = parse_reply(&body)?;
        debug!(model = %self.config.model, chars = reply.len(), "Assistant replied");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoService;

    #[async_trait]
    impl CompletionService for EchoService {
        async fn complete(&self, message: &str) -> Result<String, ChatError> {
            Ok(format!("echo: {message}"))
        }
    }

    struct DownService;

    #[async_trait]
    impl CompletionService for DownService {
        async fn complete(&self, _message: &str) -> Result<String, ChatError> {
            Err(ChatError::AssistantUnavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_ask_or_apologize_passes_reply_through() {
        assert_eq!(ask_or_apologize(&EchoService, "hi").await, "echo: hi");
    }

    #[tokio::test]
    async fn test_ask_or_apologize_hides_errors() {
        assert_eq!(ask_or_apologize(&DownService, "hi").await, UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(build_request("gpt-3.5-turbo", "Save energy?")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "Save energy?"}]
            })
        );
    }

    #[test]
    fn test_parse_reply() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Use LEDs."}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "Use LEDs.");
    }

    #[test]
    fn test_parse_reply_without_choices() {
        assert!(matches!(
            parse_reply(r#"{"choices":[]}"#),
            Err(ChatError::AssistantUnavailable(_))
        ));
        assert!(matches!(
            parse_reply("not json"),
            Err(ChatError::AssistantUnavailable(_))
        ));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = AssistantConfig {
            api_key_env: "POWERPREDICT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AssistantConfig::default()
        };
        assert!(matches!(
            OpenAiAssistant::from_config(&config),
            Err(ChatError::Configuration(_))
        ));
    }

    #[test]
    fn test_new_with_explicit_key() {
        let assistant = OpenAiAssistant::new(AssistantConfig::default(), "sk-test").unwrap();
        assert_eq!(assistant.model(), "gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let config = AssistantConfig {
            api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            connect_timeout_secs: 1,
            timeout_secs: 2,
            ..AssistantConfig::default()
        };
        let assistant = OpenAiAssistant::new(config, "sk-test").unwrap();
        assert!(matches!(
            assistant.complete("hello").await,
            Err(ChatError::AssistantUnavailable(_))
        ));
    }

    /// Serve `router` on an ephemeral local port and return its completions URL.
    async fn local_upstream(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1/chat/completions")
    }

    fn local_assistant(api_url: String) -> OpenAiAssistant {
        let config = AssistantConfig {
            api_url,
            connect_timeout_secs: 1,
            timeout_secs: 5,
            ..AssistantConfig::default()
        };
        OpenAiAssistant::new(config, "sk-test").unwrap()
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let router = axum::Router::new().route(
            "/v1/chat/completions",
            axum::routing::post(|| async {
                (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
            }),
        );
        let assistant = local_assistant(local_upstream(router).await);

        match assistant.complete("hello").await {
            Err(ChatError::AssistantUnavailable(reason)) => assert!(reason.contains("500")),
            other => panic!("expected AssistantUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_status_returns_reply() {
        let router = axum::Router::new().route(
            "/v1/chat/completions",
            axum::routing::post(|| async {
                axum::Json(serde_json::json!({
                    "choices": [{ "message": { "role": "assistant", "content": "Try LEDs." } }]
                }))
            }),
        );
        let assistant = local_assistant(local_upstream(router).await);
        assert_eq!(assistant.complete("lighting?").await.unwrap(), "Try LEDs.");
    }
}
