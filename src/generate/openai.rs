//! OpenAI-compatible chat completions adapter.
//!
//! Speaks the `/chat/completions` dialect that DeepSeek, OpenAI and most
//! self-hosted gateways accept. One request per generation, no retries:
//! callers see a failed generation immediately and decide what it is
//! worth to them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Generator;
use crate::config::BackendConfig;
use crate::error::{MuninError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: Role,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Chat completions client for one configured backend and model.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: &BackendConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| MuninError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, system: &str, texts: &[String]) -> Result<String> {
        let mut messages = Vec::with_capacity(texts.len() + 1);
        messages.push(ChatMessage {
            role: Role::System,
            content: system.to_string(),
        });
        for text in texts {
            messages.push(ChatMessage {
                role: Role::User,
                content: text.clone(),
            });
        }

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MuninError::GenerationUnavailable {
                status: Some(status.as_u16()),
                message: truncate(&body, 512),
            });
        }

        let completion: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| MuninError::GenerationUnavailable {
                    status: Some(status.as_u16()),
                    message: format!("invalid response body: {e}"),
                })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(MuninError::EmptyGeneration);
        }
        debug!(bytes = content.len(), "generation complete");
        Ok(content)
    }
}

// Backend error bodies can be arbitrarily large; keep what fits in a log line.
fn truncate(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{} (truncated)", &s[..end])
}
