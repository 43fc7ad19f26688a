use std::time::Duration;

/// Connection settings for the feedback model endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackConfig {
    /// Base URL of the chat endpoint, without the `/api/chat` path.
    pub base_url: String,
    /// Model name passed with every request.
    pub model: String,
    /// Upper bound on a single model call.
    pub timeout: Duration,
}

impl FeedbackConfig {
    pub const DEFAULT_URL: &str = "http://127.0.0.1:11434";
    pub const DEFAULT_MODEL: &str = "llama3.1";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout,
        }
    }

    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_URL,
            Self::DEFAULT_MODEL,
            Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        )
    }
}
