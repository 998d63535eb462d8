use std::sync::Arc;

use tracing::{info, warn};

use crate::core::models::SummaryRequest;
use crate::errors::BotError;
use crate::history;
use crate::storage::MessageLogStore;
use crate::web::{PageFetcher, extract_content, is_url};

/// Chooses the text a command summarizes: a fetched page or the chat's history.
pub struct CommandRouter {
    store: Arc<MessageLogStore>,
    fetcher: Arc<dyn PageFetcher>,
    history_limit: usize,
}

impl CommandRouter {
    pub fn new(
        store: Arc<MessageLogStore>,
        fetcher: Arc<dyn PageFetcher>,
        history_limit: usize,
    ) -> Self {
        Self {
            store,
            fetcher,
            history_limit,
        }
    }

    /// Resolves `argument` for `conversation_id`.
    ///
    /// A URL argument is fetched and its text extracted; anything else reads
    /// the windowed history.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::FetchError`] when the page cannot be retrieved,
    /// including when the fetch times out. Store failures never surface here.
    pub async fn resolve(
        &self,
        conversation_id: &str,
        argument: &str,
    ) -> Result<SummaryRequest, BotError> {
        let argument = argument.trim();
        if is_url(argument) {
            let raw = self.fetcher.fetch(argument).await?;
            let text = extract_content(&raw);
            info!(
                "Extracted {} chars from {} fetched bytes for chat_id={}",
                text.len(),
                raw.len(),
                conversation_id
            );
            return Ok(SummaryRequest::web_page(text));
        }

        Ok(SummaryRequest::history(self.history(conversation_id).await))
    }

    /// Windowed history for `conversation_id`, `None` when nothing was logged.
    pub async fn history(&self, conversation_id: &str) -> Option<String> {
        let entries = match self.store.get(conversation_id).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Reading history for chat_id={} failed, treating as empty: {}",
                    conversation_id, e
                );
                return None;
            }
        };
        history::window_log(entries.as_deref(), self.history_limit)
    }
}
