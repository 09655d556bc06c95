//! Chat-completion-based weekly summarization.

use chrono_tz::Tz;
use journal_core::prompt::{build_summary_prompt, SYSTEM_PROMPT};
use journal_core::{
    async_trait, parse::parse_summary_response, SummarizeError, Summarizer, TranscriptEntry,
    WeeklySummary,
};
use location_insights::LocationInsights;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{error_message, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::OpenAiConfig;

/// A [`Summarizer`] backed by OpenAI's chat completions endpoint.
///
/// The week's transcripts and location insight are rendered into a single
/// user prompt; the labeled-section response is parsed back into a
/// [`WeeklySummary`].
pub struct ChatSummarizer {
    client: Client,
    config: OpenAiConfig,
}

impl ChatSummarizer {
    /// Create a new ChatSummarizer with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, SummarizeError> {
        if config.api_key.is_empty() {
            return Err(SummarizeError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder().build().map_err(|e| {
            SummarizeError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("ChatSummarizer initialized with model: {}", config.chat_model);

        Ok(Self { client, config })
    }

    /// Create a ChatSummarizer from environment variables.
    ///
    /// See [`OpenAiConfig::from_env`] for the variables consulted.
    pub fn from_env() -> Result<Self, SummarizeError> {
        let config = OpenAiConfig::from_env()
            .map_err(|e| SummarizeError::Configuration(e.to_string()))?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, SummarizeError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.chat_model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .timeout(self.config.summarize_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizeError::Network(format!(
                        "summary request timed out after {:?}",
                        self.config.summarize_timeout
                    ))
                } else {
                    SummarizeError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Failed(error_message(status.as_u16(), &body)));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            SummarizeError::Failed(format!("Failed to parse response: {}", e))
        })?;

        Ok(completion)
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(
        &self,
        transcripts: &[TranscriptEntry],
        location: Option<&LocationInsights>,
        tz: Tz,
    ) -> Result<WeeklySummary, SummarizeError> {
        debug!(
            "Summarizing {} transcripts (location: {})",
            transcripts.len(),
            location.is_some()
        );

        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_summary_prompt(transcripts, location, tz)),
        ];

        let completion = self.chat_completion(messages).await?;

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| SummarizeError::Failed("No content in response".to_string()))?;

        if let Some(usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let summary = parse_summary_response(text);
        if summary.summary.is_empty() {
            warn!("Response had no SUMMARY section; storing unlabeled fields as-is");
        }

        Ok(summary)
    }

    fn name(&self) -> &str {
        "ChatSummarizer"
    }
}
