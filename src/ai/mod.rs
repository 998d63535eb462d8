//! All summarization functionality

pub mod client;
pub mod lead;
pub mod prompt_builder;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::core::config::AppConfig;
use crate::errors::BotError;

// Re-export main types for convenience
pub use client::{LlmClient, estimate_tokens};
pub use lead::LeadSummarizer;

/// Condenses text into an ordered list of summary lines.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// `boundary_hint` is an opaque marker forwarded with every request.
    async fn summarize(&self, boundary_hint: &str, text: &str) -> Result<Vec<String>, BotError>;
}

/// Picks the `OpenAI` summarizer when an API key is configured, otherwise the
/// offline lead-sentence summarizer.
///
/// # Errors
///
/// Returns an error if the `OpenAI` HTTP client cannot be built.
pub fn summarizer_from_config(config: &AppConfig) -> Result<Arc<dyn Summarizer>, BotError> {
    match &config.openai_api_key {
        Some(api_key) => {
            let client = LlmClient::new(
                api_key.clone(),
                config.openai_org_id.clone(),
                config.openai_model_or_default(),
                config.summary_timeout,
            )?;
            info!("Summarizing with OpenAI model {}", client.model_name());
            Ok(Arc::new(client))
        }
        None => {
            info!("OPENAI_API_KEY not set, summarizing with leading sentences");
            Ok(Arc::new(LeadSummarizer::new(config.summary_sentences)))
        }
    }
}
