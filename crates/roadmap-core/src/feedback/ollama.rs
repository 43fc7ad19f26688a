//! Ollama chat adapter.
//!
//! Posts a single user message to `{base_url}/api/chat` with streaming
//! disabled and returns `message.content` from the reply.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FeedbackModel;
use super::config::FeedbackConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// [`FeedbackModel`] backed by an Ollama-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct OllamaChat {
    client: reqwest::Client,
    chat_url: String,
    model: String,
}

impl OllamaChat {
    pub fn new(config: &FeedbackConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client for the feedback model")?;

        Ok(Self {
            client,
            chat_url: config.chat_url(),
            model: config.model.clone(),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait]
impl FeedbackModel for OllamaChat {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        debug!(url = %self.chat_url, model = %self.model, "calling feedback model");
        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("failed to reach feedback model at {}", self.chat_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("feedback model returned {status}: {body}");
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("feedback model returned an unexpected response body")?;
        Ok(reply.message.content)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_body_shape() {
        let request = ChatRequest {
            model: "llama3.1",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
            stream: false,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "llama3.1",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": false
            })
        );
    }

    #[test]
    fn response_ignores_extra_fields() {
        let reply: ChatResponse = serde_json::from_value(json!({
            "model": "llama3.1",
            "message": {"role": "assistant", "content": "&&&practice more&&&"},
            "done": true
        }))
        .unwrap();
        assert_eq!(reply.message.content, "&&&practice more&&&");
    }
}
