//! Mock transcriber implementations.

use std::collections::HashMap;
use std::sync::Mutex;

use journal_core::{async_trait, TranscribeError, Transcriber};

/// A transcriber that returns the same text for every entry.
///
/// Records each audio ref it was asked about, in call order.
#[derive(Debug, Default)]
pub struct StaticTranscriber {
    text: String,
    calls: Mutex<Vec<String>>,
}

impl StaticTranscriber {
    /// Create a transcriber that always returns `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The audio refs transcribed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, audio_ref: &str) -> Result<String, TranscribeError> {
        self.calls.lock().unwrap().push(audio_ref.to_string());
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "StaticTranscriber"
    }
}

/// A transcriber with per-audio-ref scripted outcomes.
///
/// Unscripted refs succeed with a text derived from the ref, so tests only
/// script the entries they care about.
#[derive(Debug, Default)]
pub struct ScriptedTranscriber {
    texts: HashMap<String, String>,
    failures: HashMap<String, String>,
}

impl ScriptedTranscriber {
    /// Create a transcriber with no scripted outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful transcription for `audio_ref`.
    pub fn with_text(mut self, audio_ref: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(audio_ref.into(), text.into());
        self
    }

    /// Script a failure for `audio_ref`.
    pub fn with_failure(
        mut self,
        audio_ref: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.failures.insert(audio_ref.into(), reason.into());
        self
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, audio_ref: &str) -> Result<String, TranscribeError> {
        if let Some(reason) = self.failures.get(audio_ref) {
            return Err(TranscribeError::Failed(reason.clone()));
        }

        Ok(self
            .texts
            .get(audio_ref)
            .cloned()
            .unwrap_or_else(|| format!("transcript of {}", audio_ref)))
    }

    fn name(&self) -> &str {
        "ScriptedTranscriber"
    }
}
