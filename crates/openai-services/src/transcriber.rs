//! Whisper-based audio transcription.

use std::path::Path;

use journal_core::{async_trait, TranscribeError, Transcriber};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{error_message, TranscriptionResponse};
use crate::config::OpenAiConfig;

/// A [`Transcriber`] backed by OpenAI's audio transcription endpoint.
///
/// Audio refs are treated as local file paths; the file is read and uploaded
/// as a multipart form. Each call carries its own timeout so one hung upload
/// can't stall a whole week's processing.
pub struct WhisperTranscriber {
    client: Client,
    config: OpenAiConfig,
}

impl WhisperTranscriber {
    /// Create a new WhisperTranscriber with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, TranscribeError> {
        if config.api_key.is_empty() {
            return Err(TranscribeError::Configuration(
                "API key is empty".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            TranscribeError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!(
            "WhisperTranscriber initialized with model: {}",
            config.transcription_model
        );

        Ok(Self { client, config })
    }

    /// Create a WhisperTranscriber from environment variables.
    ///
    /// See [`OpenAiConfig::from_env`] for the variables consulted.
    pub fn from_env() -> Result<Self, TranscribeError> {
        Self::new(OpenAiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio_ref: &str) -> Result<String, TranscribeError> {
        let bytes = tokio::fs::read(audio_ref).await.map_err(|e| {
            TranscribeError::AudioUnavailable(format!("{}: {}", audio_ref, e))
        })?;

        debug!("Uploading {} bytes from {}", bytes.len(), audio_ref);

        let file_name = Path::new(audio_ref)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("audio.webm")
            .to_string();

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("model", self.config.transcription_model.clone())
            .text("language", "en");

        let url = format!("{}/v1/audio/transcriptions", self.config.api_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .multipart(form)
            .timeout(self.config.transcribe_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscribeError::Network(format!(
                        "transcription request timed out after {:?}",
                        self.config.transcribe_timeout
                    ))
                } else {
                    TranscribeError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Failed(error_message(status.as_u16(), &body)));
        }

        let transcription: TranscriptionResponse = response.json().await.map_err(|e| {
            TranscribeError::Failed(format!("Failed to parse response: {}", e))
        })?;

        debug!(
            "Transcribed {} into {} chars",
            audio_ref,
            transcription.text.len()
        );

        Ok(transcription.text)
    }

    fn name(&self) -> &str {
        "WhisperTranscriber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_api_key() {
        let config = OpenAiConfig::default();
        assert!(matches!(
            WhisperTranscriber::new(config),
            Err(TranscribeError::Configuration(_))
        ));
    }

    #[test]
    fn test_name() {
        let config = OpenAiConfig::builder().api_key("sk-test").build();
        let transcriber = WhisperTranscriber::new(config).unwrap();
        assert_eq!(transcriber.name(), "WhisperTranscriber");
    }

    #[tokio::test]
    async fn test_missing_file_is_audio_unavailable() {
        let config = OpenAiConfig::builder().api_key("sk-test").build();
        let transcriber = WhisperTranscriber::new(config).unwrap();

        let result = transcriber.transcribe("/nonexistent/entry.webm").await;
        assert!(matches!(result, Err(TranscribeError::AudioUnavailable(_))));
    }
}
