use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::info;

use crate::ai::Summarizer;
use crate::core::models::{AudioReply, SummaryResult};
use crate::errors::BotError;
use crate::speech::SpeechSynthesizer;

const AUDIO_FILENAME_FORMAT: &str = "tldr_%Y-%m-%d_%H:%M.mp3";

/// Runs the summarizer and speech collaborators under a timeout.
pub struct SummaryDispatcher {
    summarizer: Arc<dyn Summarizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    boundary_hint: String,
    timeout: Duration,
}

impl SummaryDispatcher {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        boundary_hint: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            summarizer,
            synthesizer,
            boundary_hint: boundary_hint.into(),
            timeout,
        }
    }

    /// Summarizes `source_text`. Blank input yields an empty result without
    /// calling the summarizer.
    ///
    /// # Errors
    ///
    /// Returns the summarizer's error, or [`BotError::Timeout`].
    pub async fn summarize(&self, source_text: &str) -> Result<SummaryResult, BotError> {
        if source_text.trim().is_empty() {
            return Ok(SummaryResult::default());
        }

        let lines = self
            .bounded(
                "summarizer",
                self.summarizer.summarize(&self.boundary_hint, source_text),
            )
            .await?;
        info!(
            "Summarized {} chars into {} lines",
            source_text.len(),
            lines.len()
        );
        Ok(SummaryResult { lines })
    }

    /// Speaks a non-empty summary.
    ///
    /// # Errors
    ///
    /// Returns the synthesizer's error, or [`BotError::Timeout`].
    pub async fn to_speech(&self, result: &SummaryResult) -> Result<AudioReply, BotError> {
        let text = result
            .text()
            .ok_or_else(|| BotError::SpeechError("Empty summary".to_string()))?;
        let bytes = self
            .bounded("speech synthesizer", self.synthesizer.synthesize(&text))
            .await?;
        Ok(AudioReply {
            bytes,
            filename: audio_filename(Local::now()),
        })
    }

    async fn bounded<T>(
        &self,
        what: &str,
        call: impl Future<Output = Result<T, BotError>>,
    ) -> Result<T, BotError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| BotError::Timeout(format!("{what} after {:?}", self.timeout)))?
    }
}

#[must_use]
pub fn audio_filename(at: DateTime<Local>) -> String {
    at.format(AUDIO_FILENAME_FORMAT).to_string()
}
