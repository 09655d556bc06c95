//! Configuration for the OpenAI-backed services.

use std::env;
use std::time::Duration;

use journal_core::TranscribeError;

/// Configuration shared by [`WhisperTranscriber`](crate::WhisperTranscriber)
/// and [`ChatSummarizer`](crate::ChatSummarizer).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// OpenAI API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model used for audio transcription.
    pub transcription_model: String,

    /// Model used for weekly-summary chat completions.
    pub chat_model: String,

    /// Temperature for summary generation.
    pub temperature: f32,

    /// Maximum tokens for the summary response.
    pub max_tokens: u32,

    /// Per-request timeout for transcription calls.
    pub transcribe_timeout: Duration,

    /// Per-request timeout for summarization calls.
    pub summarize_timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            transcription_model: "whisper-1".to_string(),
            chat_model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 1500,
            transcribe_timeout: Duration::from_secs(120),
            summarize_timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_URL` - API base URL (default: https://api.openai.com)
    /// - `OPENAI_TRANSCRIPTION_MODEL` - Transcription model (default: whisper-1)
    /// - `OPENAI_CHAT_MODEL` - Chat model (default: gpt-4)
    /// - `OPENAI_TEMPERATURE` - Summary temperature (default: 0.7)
    /// - `OPENAI_MAX_TOKENS` - Summary max tokens (default: 1500)
    /// - `OPENAI_TRANSCRIBE_TIMEOUT_SECS` - Transcription timeout (default: 120)
    /// - `OPENAI_SUMMARIZE_TIMEOUT_SECS` - Summarization timeout (default: 60)
    pub fn from_env() -> Result<Self, TranscribeError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| TranscribeError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("OPENAI_API_URL").unwrap_or(defaults.api_url);

        let transcription_model =
            env::var("OPENAI_TRANSCRIPTION_MODEL").unwrap_or(defaults.transcription_model);

        let chat_model = env::var("OPENAI_CHAT_MODEL").unwrap_or(defaults.chat_model);

        let temperature = env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.temperature);

        let max_tokens = env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_tokens);

        let transcribe_timeout = env::var("OPENAI_TRANSCRIBE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.transcribe_timeout);

        let summarize_timeout = env::var("OPENAI_SUMMARIZE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.summarize_timeout);

        Ok(Self {
            api_url,
            api_key,
            transcription_model,
            chat_model,
            temperature,
            max_tokens,
            transcribe_timeout,
            summarize_timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }
}

/// Builder for [`OpenAiConfig`].
#[derive(Debug, Default)]
pub struct OpenAiConfigBuilder {
    config: OpenAiConfig,
}

impl OpenAiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the transcription model.
    pub fn transcription_model(mut self, model: impl Into<String>) -> Self {
        self.config.transcription_model = model.into();
        self
    }

    /// Set the chat model.
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.chat_model = model.into();
        self
    }

    /// Set the summary temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = temp;
        self
    }

    /// Set the summary max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = tokens;
        self
    }

    /// Set the transcription timeout.
    pub fn transcribe_timeout(mut self, timeout: Duration) -> Self {
        self.config.transcribe_timeout = timeout;
        self
    }

    /// Set the summarization timeout.
    pub fn summarize_timeout(mut self, timeout: Duration) -> Self {
        self.config.summarize_timeout = timeout;
        self
    }

    /// Build the config.
    pub fn build(self) -> OpenAiConfig {
        self.config
    }
}
