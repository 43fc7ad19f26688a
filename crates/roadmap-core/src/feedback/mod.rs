//! Feedback service: ask a language model for advice on a task and attach
//! the answer to it.

mod config;
mod ollama;
mod prompt;
mod service;

use anyhow::Result;
use async_trait::async_trait;

pub use config::FeedbackConfig;
pub use ollama::OllamaChat;
pub use prompt::feedback_prompt;

/// A text-in, text-out language model.
///
/// Each call is a single user message with no conversation history.
#[async_trait]
pub trait FeedbackModel: Send + Sync {
    /// Short name used in logs (e.g. "ollama").
    fn name(&self) -> &str;

    /// Send `prompt` and return the model's reply verbatim.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// Compile-time assertion: FeedbackModel must be usable as `dyn FeedbackModel`.
const _: () = {
    fn _assert_object_safe(_: &dyn FeedbackModel) {}
};
