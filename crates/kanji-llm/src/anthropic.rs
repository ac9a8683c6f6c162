use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{GenerateError, Generation, TextGenerator};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetails {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// Server-sent event payloads of a streamed message
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: BlockDelta },
    MessageDelta { delta: MessageDelta },
    Error { error: ApiErrorDetails },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BlockDelta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessageDelta {
    #[serde(default)]
    stop_reason: Option<String>,
}

/// Text and stop reason gathered from a stream
#[derive(Default)]
struct StreamState {
    text: String,
    stop_reason: Option<String>,
}

impl StreamState {
    /// Apply one SSE line. Only `data:` lines carry payloads.
    fn apply_line(
        &mut self,
        line: &str,
        on_text: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), GenerateError> {
        let Some(data) = line.trim_end_matches('\r').strip_prefix("data:") else {
            return Ok(());
        };
        let event: StreamEvent = match serde_json::from_str(data.trim()) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!("Skipping unreadable stream event: {}", e);
                return Ok(());
            }
        };

        match event {
            StreamEvent::ContentBlockDelta {
                delta: BlockDelta::TextDelta { text },
            } => {
                on_text(&text);
                self.text.push_str(&text);
            }
            StreamEvent::MessageDelta { delta } => {
                if delta.stop_reason.is_some() {
                    self.stop_reason = delta.stop_reason;
                }
            }
            StreamEvent::Error { error } => {
                return Err(GenerateError::ApiError(format!(
                    "{} - {}",
                    error.error_type, error.message
                )));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Anthropic Messages API client
#[derive(Clone)]
pub struct AnthropicGenerator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    max_tokens: u32,
}

impl AnthropicGenerator {
    pub fn new(api_key: String, api_url: String, max_tokens: u32, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            api_key,
            api_url,
            max_tokens,
        }
    }

    /// Send a request and map error statuses
    async fn send(
        &self,
        system: &str,
        prompt: &str,
        model: &str,
        stream: bool,
    ) -> Result<reqwest::Response, GenerateError> {
        if self.api_key.is_empty() {
            return Err(GenerateError::AuthenticationError);
        }

        let request = MessagesRequest {
            model,
            max_tokens: self.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            stream,
        };

        tracing::debug!("Requesting mnemonic from {} ({} chars)", model, prompt.len());

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(GenerateError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(GenerateError::AuthenticationError);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(&body) {
                return Err(GenerateError::ApiError(format!(
                    "HTTP {}: {} - {}",
                    status, parsed.error.error_type, parsed.error.message
                )));
            }
            return Err(GenerateError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        Ok(response)
    }

    fn finish(text: String, model: &str, stop_reason: Option<String>) -> Result<Generation, GenerateError> {
        if text.trim().is_empty() {
            return Err(GenerateError::EmptyResponse);
        }

        Ok(Generation {
            text,
            model: model.to_string(),
            provider: "anthropic".to_string(),
            stop_reason,
        })
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        model: &str,
    ) -> Result<Generation, GenerateError> {
        let response = self.send(system, prompt, model, false).await?;

        let completion: MessagesResponse = response.json().await.map_err(|e| {
            GenerateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        let text: String = completion
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        Self::finish(text, model, completion.stop_reason)
    }

    async fn generate_streaming(
        &self,
        system: &str,
        prompt: &str,
        model: &str,
        on_text: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<Generation, GenerateError> {
        let mut response = self.send(system, prompt, model, true).await?;

        let mut state = StreamState::default();
        let mut pending: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            pending.extend_from_slice(&chunk);
            // A newline byte never occurs inside a multi-byte UTF-8 sequence
            while let Some(end) = pending.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = pending.drain(..=end).collect();
                state.apply_line(&String::from_utf8_lossy(&line[..end]), on_text)?;
            }
        }
        if !pending.is_empty() {
            state.apply_line(&String::from_utf8_lossy(&pending), on_text)?;
        }

        Self::finish(state.text, model, state.stop_reason)
    }
}
